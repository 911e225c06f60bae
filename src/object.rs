//! Direct object types.
//!
//! A closed tagged union over the direct-object kinds found inside
//! indirect objects, dictionaries and arrays. Each variant carries only the
//! fields it needs: a `Reference` knows its destination number, containers
//! know their span and recover children on demand through
//! [`crate::classify`]. Strings exist in the lexical grammar but are never
//! produced by the classifier, so they have no variant here.

use crate::span::Span;

/// A direct object, located by its span in the document buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectObject {
    /// `true` or `false`
    Boolean {
        /// Location of the literal
        span: Span,
        /// The parsed value
        value: bool,
    },
    /// Integer or real literal
    Numeric {
        /// Location of the literal
        span: Span,
    },
    /// `/`-prefixed name
    Name {
        /// Location including the leading slash
        span: Span,
    },
    /// The `null` literal
    Null {
        /// Location of the literal
        span: Span,
    },
    /// Reference to an indirect object, `N G R`
    Reference {
        /// Location of the whole token
        span: Span,
        /// Destination object number
        target: u32,
        /// Generation number
        generation: u32,
    },
    /// `[ ... ]`
    Array {
        /// Location including both delimiters
        span: Span,
    },
    /// `<< ... >>`
    Dictionary {
        /// Location including both delimiters
        span: Span,
    },
    /// `stream ... endstream`
    Stream {
        /// Location including both keywords
        span: Span,
    },
}

impl DirectObject {
    /// The span this object covers.
    pub fn span(&self) -> Span {
        match self {
            DirectObject::Boolean { span, .. }
            | DirectObject::Numeric { span }
            | DirectObject::Name { span }
            | DirectObject::Null { span }
            | DirectObject::Reference { span, .. }
            | DirectObject::Array { span }
            | DirectObject::Dictionary { span }
            | DirectObject::Stream { span } => *span,
        }
    }

    /// Human-readable type name, without data.
    pub fn type_name(&self) -> &'static str {
        match self {
            DirectObject::Boolean { .. } => "Boolean",
            DirectObject::Numeric { .. } => "Numeric",
            DirectObject::Name { .. } => "Name",
            DirectObject::Null { .. } => "Null",
            DirectObject::Reference { .. } => "Reference",
            DirectObject::Array { .. } => "Array",
            DirectObject::Dictionary { .. } => "Dictionary",
            DirectObject::Stream { .. } => "Stream",
        }
    }

    /// Destination number, if this is a reference.
    pub fn as_reference(&self) -> Option<u32> {
        match self {
            DirectObject::Reference { target, .. } => Some(*target),
            _ => None,
        }
    }

    /// Boolean value, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DirectObject::Boolean { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Whether this is a name.
    pub fn is_name(&self) -> bool {
        matches!(self, DirectObject::Name { .. })
    }

    /// Whether this is a dictionary.
    pub fn is_dictionary(&self) -> bool {
        matches!(self, DirectObject::Dictionary { .. })
    }

    /// Whether this is an array.
    pub fn is_array(&self) -> bool {
        matches!(self, DirectObject::Array { .. })
    }

    /// Name bytes including the leading slash, if this is a name.
    pub fn name_bytes<'a>(&self, buf: &'a [u8]) -> Option<&'a [u8]> {
        match self {
            DirectObject::Name { span } => Some(span.bytes(buf)),
            _ => None,
        }
    }
}
