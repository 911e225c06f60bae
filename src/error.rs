//! Error types for the structural editor.
//!
//! All parse-time errors are fatal and propagate to the caller immediately;
//! no partially parsed document is ever returned. `DanglingReference` is the
//! one non-fatal variant: the editor collects it into its warning list
//! instead of returning it, since dangling references can already exist in
//! malformed source documents.

/// Result type alias for editor operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while parsing or editing a document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The '%PDF' header marker was not found.
    #[error("Invalid PDF header: '%PDF' marker not found")]
    InvalidHeader,

    /// The input advertises a compression filter and cannot be edited.
    ///
    /// This is a fatal pre-condition checked before parsing begins: the
    /// editor only operates on uncompressed buffers. Decompression is an
    /// external collaborator's job.
    #[error("Compressed input: stream advertises filter /{0}; decompress before editing")]
    CompressedInput(String),

    /// Opening and closing delimiter counts disagree within a scanned region.
    #[error("Mismatched {kind} delimiters: {starts} openers, {ends} closers")]
    MismatchedDelimiters {
        /// Delimiter kind ("dictionary" or "array")
        kind: &'static str,
        /// Number of start tokens found
        starts: usize,
        /// Number of end tokens found
        ends: usize,
    },

    /// A dictionary's children do not form (Name, value) pairs.
    #[error("Invalid dictionary at byte {offset}: {reason}")]
    InvalidDictionary {
        /// Byte offset of the dictionary's opening delimiter
        offset: usize,
        /// Reason the pairing failed
        reason: String,
    },

    /// Structural parse failure at a specific byte offset.
    #[error("Failed to parse document at byte {offset}: {reason}")]
    ParseError {
        /// Byte offset where parsing failed
        offset: usize,
        /// Reason for the failure
        reason: String,
    },

    /// A search was requested over a span that exceeds the buffer.
    #[error("Search span {start}..{end} is not contained in a buffer of {len} bytes")]
    SpanOutOfBounds {
        /// Requested span start
        start: usize,
        /// Requested span end
        end: usize,
        /// Buffer length
        len: usize,
    },

    /// A reference whose destination has no in-use xref entry (non-fatal).
    ///
    /// Surfaced through [`crate::editor::DocumentEditor::warnings`] rather
    /// than returned; it does not abort a document rewrite.
    #[error("Dangling reference to object {target} at byte {offset}")]
    DanglingReference {
        /// Destination object number of the dangling reference
        target: u32,
        /// Byte offset of the reference (or of the trailer that lost it)
        offset: usize,
    },

    /// Post-edit validation failed and `rebuild_xref` alone cannot repair it.
    #[error("Document failed post-edit validation: {0}")]
    BrokenDocument(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
