//! Structural editing: object deletion and xref regeneration.
//!
//! The editor owns a [`Document`] and rewrites its bytes. Deletion works in
//! three passes per target, highest object number first: splice the
//! object's definition out of the buffer, renumber every surviving `N G R`
//! and `N G obj` token so numbering stays compact, then rebuild the xref
//! table from the actual layout. Conditions that leave the document usable
//! but questionable, a reference whose destination is gone, or deleting the
//! root itself, are collected as warnings instead of failing the edit.

use std::collections::HashSet;
use std::path::Path;

use crate::document::Document;
use crate::error::{Error, Result};
use crate::patterns;
use crate::span::{find_within, splice_out, Span};
use crate::xref::{serialize_table, XrefEntry};

/// Rewrite every renumberable token after object `deleted` was removed.
///
/// Numbers below the deleted one are untouched, tokens naming the deleted
/// object are dropped outright, and numbers above it shift down by one.
/// Tokens whose digits do not parse are kept as-is with a warning.
fn renumber(buf: &[u8], deleted: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(buf.len());
    let mut last = 0usize;
    for caps in patterns::RENUMBER.captures_iter(buf) {
        let Some(whole) = caps.get(0) else { continue };
        out.extend_from_slice(&buf[last..whole.start()]);
        last = whole.end();

        let number = std::str::from_utf8(&caps[1])
            .ok()
            .and_then(|s| s.parse::<u32>().ok());
        match number {
            Some(n) if n == deleted => {
                // The declaration is already spliced out; any token still
                // naming this number is a reference to it.
            }
            Some(n) if n > deleted => {
                out.extend_from_slice((n - 1).to_string().as_bytes());
                out.extend_from_slice(&caps[2]);
            }
            Some(_) => out.extend_from_slice(whole.as_bytes()),
            None => {
                log::warn!(
                    "unparseable object number at byte {}, token kept",
                    whole.start()
                );
                out.extend_from_slice(whole.as_bytes());
            }
        }
    }
    out.extend_from_slice(&buf[last..]);
    out
}

/// Editor over one document.
#[derive(Debug)]
pub struct DocumentEditor {
    document: Document,
    warnings: Vec<Error>,
}

impl DocumentEditor {
    /// Wrap a parsed document for editing.
    pub fn new(document: Document) -> Self {
        Self { document, warnings: Vec::new() }
    }

    /// Read, parse and wrap a document from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(Document::open(path)?))
    }

    /// The current state of the document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Warnings accumulated across edits, in the order they were found.
    pub fn warnings(&self) -> &[Error] {
        &self.warnings
    }

    /// Give up the editor and keep the document.
    pub fn into_document(self) -> Document {
        self.document
    }

    /// Delete the given objects and regenerate the xref table.
    ///
    /// Targets are processed highest number first so the renumbering of one
    /// deletion cannot shift a later target. Numbers with no matching
    /// object are skipped. Deleting the root destination, or uncovering a
    /// reference with no destination, records a
    /// [`Error::DanglingReference`] warning; the edit itself still
    /// succeeds. Fails with [`Error::BrokenDocument`] only when the
    /// rewritten document no longer parses or validates.
    pub fn delete_objects(&mut self, numbers: &[u32]) -> Result<()> {
        let mut targets: Vec<u32> = numbers.to_vec();
        targets.sort_unstable();
        targets.dedup();

        for &target in targets.iter().rev() {
            self.delete_one(target)?;
        }

        self.rebuild_xref()?;
        if !self.document.validate() {
            return Err(Error::BrokenDocument(
                "xref does not match the layout after deletion".to_string(),
            ));
        }
        self.collect_dangling()?;
        Ok(())
    }

    fn delete_one(&mut self, target: u32) -> Result<()> {
        let Some(object) = self.document.object(target) else {
            log::warn!("object {} not present, nothing to delete", target);
            return Ok(());
        };
        let span = object.span;

        // The /Root token itself is dropped by the renumber pass, so the
        // trailer can no longer be probed afterwards. Record the damage now.
        if self.document.xref().trailer.root(self.document.bytes())? == Some(target) {
            let offset = self.document.xref().trailer.span().start;
            log::warn!("object {} is the document root", target);
            self.warnings.push(Error::DanglingReference { target, offset });
        }

        let without = splice_out(self.document.bytes(), &[span]);
        let renumbered = renumber(&without, target);
        self.document = Document::from_bytes(renumbered).map_err(|e| {
            Error::BrokenDocument(format!("document unparseable after deleting {}: {}", target, e))
        })?;
        log::debug!("deleted object {}", target);
        Ok(())
    }

    /// Regenerate the xref table from the actual object layout.
    ///
    /// Everything before the old xref section is kept byte-for-byte; the
    /// section, trailer /Size, and startxref pointer are rewritten from the
    /// recorded offsets. Running this on a consistent document reproduces
    /// it exactly.
    pub fn rebuild_xref(&mut self) -> Result<()> {
        let buf = self.document.bytes();
        let section_start = self.document.xref().span.start;
        let trailer_dict = self.document.xref().trailer.span().bytes(buf).to_vec();

        let mut entries = vec![XrefEntry::free(self.document.header_offset() as u32, 65535)];
        for object in self.document.objects() {
            entries.push(XrefEntry::in_use(object.span.start as u32, object.generation));
        }

        let mut out = Vec::with_capacity(buf.len());
        out.extend_from_slice(&buf[..section_start]);
        let xref_start = out.len();
        out.extend_from_slice(&serialize_table(&entries, &trailer_dict, xref_start));

        self.document = Document::from_bytes(out).map_err(|e| {
            Error::BrokenDocument(format!("document unparseable after xref rebuild: {}", e))
        })?;
        log::debug!("rebuilt xref: {} entries at byte {}", entries.len(), xref_start);
        Ok(())
    }

    fn collect_dangling(&mut self) -> Result<()> {
        let buf = self.document.bytes();
        let in_use: HashSet<u32> = self
            .document
            .xref()
            .numbered_entries()
            .into_iter()
            .filter(|(_, e)| e.in_use)
            .map(|(n, _)| n)
            .collect();

        let mut found = Vec::new();
        for m in find_within(&patterns::REFERENCE, buf, Span::whole(buf))? {
            let Some(target) = m
                .group_bytes(buf, 1)
                .and_then(|b| std::str::from_utf8(b).ok())
                .and_then(|s| s.parse::<u32>().ok())
            else {
                continue;
            };
            // Destination 0 is the explicit-null convention, never dangling.
            if target != 0 && !in_use.contains(&target) {
                log::warn!("reference to missing object {} at byte {}", target, m.span.start);
                found.push(Error::DanglingReference { target, offset: m.span.start });
            }
        }
        self.warnings.extend(found);
        Ok(())
    }

    /// Write the document to disk, refusing an inconsistent one.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if !self.document.validate() {
            return Err(Error::BrokenDocument(
                "refusing to save: xref does not match the layout".to_string(),
            ));
        }
        self.document.save(path)
    }
}
