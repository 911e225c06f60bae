//! Direct-object classification.
//!
//! Splits the interior of an indirect object (or of a dictionary or array
//! body) into non-overlapping typed [`DirectObject`]s. Whitespace and
//! structural punctuation are not objects and are simply left uncovered.
//!
//! Candidates come from two sources: the bracket matcher for dictionaries
//! and arrays, and the pattern library for everything else. They are then
//! accepted greedily in a fixed precedence order -- Dictionary, Array,
//! Stream, Name, Reference, Boolean, Numeric, Null -- where a candidate
//! nested inside an accepted span is consumed by it, and only maximal
//! spans survive. The more specific constructs must win first, otherwise
//! the digits of a reference or the body of a dictionary would be misread
//! as standalone numerics.

use crate::brackets::{match_brackets, Delimiter};
use crate::error::{Error, Result};
use crate::object::DirectObject;
use crate::patterns;
use crate::span::{find_within, Span};

/// Parse the decimal bytes of `span` as a `u32`.
pub(crate) fn parse_u32(buf: &[u8], span: Span) -> Result<u32> {
    std::str::from_utf8(span.bytes(buf))
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| Error::ParseError {
            offset: span.start,
            reason: format!("'{}' is not a u32", String::from_utf8_lossy(span.bytes(buf))),
        })
}

/// Classify the bytes of `within` into typed direct objects, ordered by
/// start offset.
pub fn classify(buf: &[u8], within: Span) -> Result<Vec<DirectObject>> {
    let mut candidates: Vec<DirectObject> = Vec::new();

    // Precedence order: containers and streams before names, names before
    // references, references before the bare literals.
    for span in match_brackets(buf, within, Delimiter::Dictionary)? {
        candidates.push(DirectObject::Dictionary { span });
    }
    for span in match_brackets(buf, within, Delimiter::Array)? {
        candidates.push(DirectObject::Array { span });
    }
    for m in find_within(&patterns::STREAM, buf, within)? {
        candidates.push(DirectObject::Stream { span: m.span });
    }
    for m in find_within(&patterns::NAME, buf, within)? {
        candidates.push(DirectObject::Name { span: m.span });
    }
    for m in find_within(&patterns::REFERENCE, buf, within)? {
        let target = m
            .group(1)
            .map(|s| parse_u32(buf, s))
            .transpose()?
            .ok_or_else(|| Error::ParseError {
                offset: m.span.start,
                reason: "reference without a destination number".to_string(),
            })?;
        let generation = m
            .group(2)
            .map(|s| parse_u32(buf, s))
            .transpose()?
            .unwrap_or(0);
        candidates.push(DirectObject::Reference { span: m.span, target, generation });
    }
    for m in find_within(&patterns::BOOLEAN, buf, within)? {
        let value = m.group_bytes(buf, 1) == Some(&b"true"[..]);
        candidates.push(DirectObject::Boolean { span: m.span, value });
    }
    for m in find_within(&patterns::NUMERIC, buf, within)? {
        candidates.push(DirectObject::Numeric { span: m.span });
    }
    for m in find_within(&patterns::NULL, buf, within)? {
        candidates.push(DirectObject::Null { span: m.span });
    }

    // A candidate nested inside an already accepted span belongs to that
    // object's interior and is consumed by it.
    let mut accepted: Vec<DirectObject> = Vec::new();
    let mut taken: Vec<Span> = Vec::new();
    for candidate in candidates {
        let span = candidate.span();
        if taken.iter().any(|t| t.contains(span)) {
            continue;
        }
        taken.push(span);
        accepted.push(candidate);
    }

    // The dictionary pass runs before the array pass, so a dictionary nested
    // inside an array was accepted before the array existed to consume it.
    // Keep only maximal spans; nested containers are recovered through
    // `children()`.
    let spans: Vec<Span> = accepted.iter().map(|o| o.span()).collect();
    let mut result: Vec<DirectObject> = accepted
        .into_iter()
        .enumerate()
        .filter(|(i, obj)| {
            let span = obj.span();
            !spans
                .iter()
                .enumerate()
                .any(|(j, other)| j != *i && other.len() > span.len() && other.contains(span))
        })
        .map(|(_, obj)| obj)
        .collect();

    result.sort_by_key(|obj| obj.span().start);
    Ok(result)
}

impl DirectObject {
    /// Recover the children of a dictionary or array by re-classifying the
    /// span's interior. Non-container objects have no children.
    pub fn children(&self, buf: &[u8]) -> Result<Vec<DirectObject>> {
        match self {
            DirectObject::Dictionary { span } => {
                classify(buf, span.interior(Delimiter::Dictionary.token_width()))
            }
            DirectObject::Array { span } => {
                classify(buf, span.interior(Delimiter::Array.token_width()))
            }
            _ => Ok(Vec::new()),
        }
    }
}

/// Pair a dictionary's children into (key, value) tuples in left-to-right
/// order.
///
/// The children must alternate Name/value and come in an even count;
/// anything else is an `InvalidDictionary` error.
pub fn dictionary_entries(
    buf: &[u8],
    dict: &DirectObject,
) -> Result<Vec<(DirectObject, DirectObject)>> {
    let DirectObject::Dictionary { span } = dict else {
        return Err(Error::InvalidDictionary {
            offset: dict.span().start,
            reason: format!("expected Dictionary, found {}", dict.type_name()),
        });
    };

    let children = dict.children(buf)?;
    if children.len() % 2 != 0 {
        return Err(Error::InvalidDictionary {
            offset: span.start,
            reason: format!("{} children do not pair into keys and values", children.len()),
        });
    }

    let mut entries = Vec::with_capacity(children.len() / 2);
    for pair in children.chunks_exact(2) {
        let (key, value) = (pair[0], pair[1]);
        if !key.is_name() {
            return Err(Error::InvalidDictionary {
                offset: span.start,
                reason: format!("key at byte {} is {}, expected Name", key.span().start, key.type_name()),
            });
        }
        entries.push((key, value));
    }
    Ok(entries)
}

/// Look up a dictionary value by key (without the leading slash).
pub fn dictionary_get(buf: &[u8], dict: &DirectObject, key: &[u8]) -> Result<Option<DirectObject>> {
    let entries = dictionary_entries(buf, dict)?;
    Ok(entries
        .into_iter()
        .find(|(k, _)| k.name_bytes(buf).map(|b| &b[1..]) == Some(key))
        .map(|(_, v)| v))
}
