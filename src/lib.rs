//! # pdf_scalpel
//!
//! Structural editor for uncompressed, single-revision PDF-style documents.
//!
//! The crate parses a raw byte stream into its indirect objects, their
//! typed direct-object contents, and the cross-reference table, then
//! supports deleting objects while keeping the file consistent: surviving
//! references are renumbered, references to removed objects are dropped,
//! and the xref table is regenerated from the actual byte layout.
//!
//! Parsing is span-based and lexical. A fixed table of byte patterns
//! ([`patterns`]) locates every construct, a depth counter pairs nested
//! dictionary and array delimiters ([`brackets`]), and a precedence-ordered
//! classifier ([`classify`]) turns the matches into non-overlapping
//! [`DirectObject`]s. The original bytes are never interpreted beyond
//! that; object and stream contents stay opaque.
//!
//! ## Quick start
//!
//! ```ignore
//! use pdf_scalpel::{Document, DocumentEditor};
//!
//! let mut editor = DocumentEditor::open("report.pdf")?;
//! editor.delete_objects(&[14, 15])?;
//! for warning in editor.warnings() {
//!     eprintln!("warning: {warning}");
//! }
//! editor.save("report-clean.pdf")?;
//! ```
//!
//! Compressed input is refused up front: any stream filter declaration
//! makes byte-level patterns unreliable, and the crate does not decode
//! filters.

pub mod brackets;
pub mod classify;
pub mod document;
pub mod editor;
pub mod error;
pub mod object;
pub mod patterns;
pub mod span;
pub mod xref;

pub use document::{Document, IndirectObject};
pub use editor::DocumentEditor;
pub use error::{Error, Result};
pub use object::DirectObject;
pub use span::Span;
pub use xref::{XrefEntry, XrefTable};
