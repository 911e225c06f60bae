//! Cross-reference table model.
//!
//! The xref table maps object numbers to byte offsets, one fixed-width
//! 20-byte entry per number, grouped into blocks that each cover a
//! contiguous run of numbers. The trailer dictionary anchors the document
//! root and declares the object-number count. A single-revision document
//! carries exactly one xref section and one startxref pointer.

use crate::brackets::{match_brackets, Delimiter};
use crate::classify::{dictionary_get, parse_u32};
use crate::error::{Error, Result};
use crate::object::DirectObject;
use crate::patterns;
use crate::span::{find_first, find_within, Span};

/// One cross-reference entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XrefEntry {
    /// Byte offset of the object's "N G obj" opener (or of the header
    /// marker, for the free-list head)
    pub offset: u32,
    /// Generation number
    pub generation: u32,
    /// Whether the entry is in use (`n`) or free (`f`)
    pub in_use: bool,
}

impl XrefEntry {
    /// Create an in-use entry.
    pub fn in_use(offset: u32, generation: u32) -> Self {
        Self { offset, generation, in_use: true }
    }

    /// Create a free entry.
    pub fn free(offset: u32, generation: u32) -> Self {
        Self { offset, generation, in_use: false }
    }

    /// Emit the fixed 20-byte form: "<10-digit offset> <5-digit gen> <n|f> \n".
    pub fn serialize(&self) -> Vec<u8> {
        format!(
            "{:010} {:05} {} \n",
            self.offset,
            self.generation,
            if self.in_use { 'n' } else { 'f' }
        )
        .into_bytes()
    }
}

/// A contiguous run of entries starting at `start_number`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XrefBlock {
    /// Object number of the first entry
    pub start_number: u32,
    /// Entries for `start_number`, `start_number + 1`, ...
    pub entries: Vec<XrefEntry>,
}

/// The trailer dictionary.
#[derive(Debug, Clone, Copy)]
pub struct Trailer {
    /// The dictionary direct object (span covers `<<` through `>>`)
    pub dict: DirectObject,
}

impl Trailer {
    /// Span of the trailer dictionary.
    pub fn span(&self) -> Span {
        self.dict.span()
    }

    /// Destination number of the /Root reference, if present.
    ///
    /// Probed with a flat pattern rather than full classification: a
    /// trailer that has just lost its root value no longer pairs into
    /// key/value tuples but must still be inspectable.
    pub fn root(&self, buf: &[u8]) -> Result<Option<u32>> {
        let Some(m) = find_first(&patterns::TRAILER_ROOT, buf, self.span())? else {
            return Ok(None);
        };
        let Some(target) = m.group(1) else { return Ok(None) };
        Ok(Some(parse_u32(buf, target)?))
    }

    /// The declared /Size value, if present and well-formed.
    pub fn size(&self, buf: &[u8]) -> Result<Option<u32>> {
        match dictionary_get(buf, &self.dict, b"Size")? {
            Some(DirectObject::Numeric { span }) => Ok(Some(parse_u32(buf, span)?)),
            _ => Ok(None),
        }
    }
}

/// The document's cross-reference table: blocks, trailer, and the
/// startxref pointer.
#[derive(Debug, Clone)]
pub struct XrefTable {
    /// Span of the whole section, from "xref" through the trailer
    pub span: Span,
    /// Entry blocks in file order
    pub blocks: Vec<XrefBlock>,
    /// The trailer dictionary
    pub trailer: Trailer,
    /// Byte offset declared by the startxref pointer
    pub startxref: u32,
}

impl XrefTable {
    /// Parse the single xref section of `buf`.
    ///
    /// A single-revision document has exactly one section and exactly one
    /// startxref pointer; anything else is a parse error.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        let whole = Span::whole(buf);

        let sections = find_within(&patterns::XREF_SECTION, buf, whole)?;
        let section = match sections.as_slice() {
            [one] => one,
            [] => {
                return Err(Error::ParseError {
                    offset: buf.len(),
                    reason: "no xref section found".to_string(),
                })
            }
            more => {
                return Err(Error::ParseError {
                    offset: more[1].span.start,
                    reason: format!("{} xref sections in a single-revision document", more.len()),
                })
            }
        };

        let pointers = find_within(&patterns::STARTXREF, buf, whole)?;
        let pointer = match pointers.as_slice() {
            [one] => one,
            [] => {
                return Err(Error::ParseError {
                    offset: buf.len(),
                    reason: "no startxref pointer found".to_string(),
                })
            }
            more => {
                return Err(Error::ParseError {
                    offset: more[1].span.start,
                    reason: format!("{} startxref pointers in a single-revision document", more.len()),
                })
            }
        };
        let startxref = pointer
            .group(1)
            .map(|s| parse_u32(buf, s))
            .transpose()?
            .unwrap_or(0);

        let block_region = section.group(1).ok_or_else(|| Error::ParseError {
            offset: section.span.start,
            reason: "xref section without entry blocks".to_string(),
        })?;

        let mut blocks = Vec::new();
        for bm in find_within(&patterns::XREF_BLOCK, buf, block_region)? {
            let start_number = bm
                .group(1)
                .map(|s| parse_u32(buf, s))
                .transpose()?
                .unwrap_or(0);
            let declared = bm
                .group(2)
                .map(|s| parse_u32(buf, s))
                .transpose()?
                .unwrap_or(0);
            let lines = bm.group(3).ok_or_else(|| Error::ParseError {
                offset: bm.span.start,
                reason: "xref block without entries".to_string(),
            })?;

            let mut entries = Vec::new();
            for em in find_within(&patterns::XREF_ENTRY, buf, lines)? {
                let offset = em
                    .group(1)
                    .map(|s| parse_u32(buf, s))
                    .transpose()?
                    .unwrap_or(0);
                let generation = em
                    .group(2)
                    .map(|s| parse_u32(buf, s))
                    .transpose()?
                    .unwrap_or(0);
                let in_use = em.group_bytes(buf, 3) == Some(&b"n"[..]);
                entries.push(XrefEntry { offset, generation, in_use });
            }

            if entries.len() as u32 != declared {
                log::warn!(
                    "xref block at byte {} declares {} entries but carries {}",
                    bm.span.start,
                    declared,
                    entries.len()
                );
            }
            blocks.push(XrefBlock { start_number, entries });
        }

        let trailer_region = section.group(2).ok_or_else(|| Error::ParseError {
            offset: section.span.start,
            reason: "xref section without a trailer dictionary".to_string(),
        })?;
        let dict_span = match_brackets(buf, trailer_region, Delimiter::Dictionary)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::ParseError {
                offset: trailer_region.start,
                reason: "trailer is not a dictionary".to_string(),
            })?;

        log::debug!(
            "parsed xref section at byte {}: {} block(s), startxref {}",
            section.span.start,
            blocks.len(),
            startxref
        );

        Ok(Self {
            span: section.span,
            blocks,
            trailer: Trailer { dict: DirectObject::Dictionary { span: dict_span } },
            startxref,
        })
    }

    /// All entries with their object numbers, in block order.
    pub fn numbered_entries(&self) -> Vec<(u32, &XrefEntry)> {
        self.blocks
            .iter()
            .flat_map(|block| {
                block
                    .entries
                    .iter()
                    .enumerate()
                    .map(move |(i, entry)| (block.start_number + i as u32, entry))
            })
            .collect()
    }

    /// The entry for `number`, if the table covers it.
    pub fn entry(&self, number: u32) -> Option<&XrefEntry> {
        self.numbered_entries()
            .into_iter()
            .find(|(n, _)| *n == number)
            .map(|(_, e)| e)
    }
}

/// Emit a complete xref section: entries as a single block starting at 0,
/// the trailer with its /Size rewritten, and the startxref pointer.
pub fn serialize_table(entries: &[XrefEntry], trailer_dict: &[u8], xref_start: usize) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"xref\n");
    out.extend_from_slice(format!("0 {}\n", entries.len()).as_bytes());
    for entry in entries {
        out.extend_from_slice(&entry.serialize());
    }
    out.extend_from_slice(b"trailer\n");

    let size = format!("/Size {}", entries.len());
    if !patterns::SIZE_ENTRY.is_match(trailer_dict) {
        log::warn!("trailer dictionary has no /Size entry to rewrite");
    }
    let rewritten = patterns::SIZE_ENTRY.replace(trailer_dict, size.as_bytes());
    out.extend_from_slice(&rewritten);

    out.extend_from_slice(b"\nstartxref\n");
    out.extend_from_slice(format!("{}\n", xref_start).as_bytes());
    out.extend_from_slice(b"%%EOF\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECTION: &[u8] = b"1 0 obj\n<<>>\nendobj\nxref\n0 3\n0000000000 65535 f \n0000000009 00000 n \n0000000052 00000 n \ntrailer\n<< /Size 3 /Root 1 0 R >>\nstartxref\n20\n%%EOF\n";

    #[test]
    fn test_parse_section() {
        let table = XrefTable::parse(SECTION).unwrap();
        assert_eq!(table.blocks.len(), 1);
        assert_eq!(table.blocks[0].start_number, 0);
        assert_eq!(table.blocks[0].entries.len(), 3);
        assert_eq!(table.startxref, 20);

        let head = &table.blocks[0].entries[0];
        assert!(!head.in_use);
        assert_eq!(head.generation, 65535);
        assert_eq!(table.blocks[0].entries[1], XrefEntry::in_use(9, 0));
    }

    #[test]
    fn test_numbered_entries() {
        let table = XrefTable::parse(SECTION).unwrap();
        let numbered = table.numbered_entries();
        assert_eq!(numbered.len(), 3);
        assert_eq!(numbered[2].0, 2);
        assert_eq!(numbered[2].1.offset, 52);
        assert_eq!(table.entry(1), Some(&XrefEntry::in_use(9, 0)));
        assert_eq!(table.entry(9), None);
    }

    #[test]
    fn test_trailer_root_and_size() {
        let table = XrefTable::parse(SECTION).unwrap();
        assert_eq!(table.trailer.root(SECTION).unwrap(), Some(1));
        assert_eq!(table.trailer.size(SECTION).unwrap(), Some(3));
    }

    #[test]
    fn test_missing_startxref_is_an_error() {
        let err = XrefTable::parse(b"xref\n0 1\n0000000000 65535 f \ntrailer\n<< /Size 1 >>\n").unwrap_err();
        assert!(matches!(err, Error::ParseError { .. }));
    }

    #[test]
    fn test_entry_serialization_is_fixed_width() {
        let entry = XrefEntry::in_use(9, 0);
        assert_eq!(entry.serialize(), b"0000000009 00000 n \n");
        assert_eq!(entry.serialize().len(), 20);

        let head = XrefEntry::free(0, 65535);
        assert_eq!(head.serialize(), b"0000000000 65535 f \n");
    }

    #[test]
    fn test_serialize_table_rewrites_size() {
        let entries = [XrefEntry::free(0, 65535), XrefEntry::in_use(9, 0)];
        let out = serialize_table(&entries, b"<< /Size 9 /Root 1 0 R >>", 42);
        let text = String::from_utf8_lossy(&out);
        assert!(text.starts_with("xref\n0 2\n"));
        assert!(text.contains("/Size 2"));
        assert!(!text.contains("/Size 9"));
        assert!(text.contains("startxref\n42\n%%EOF"));
    }
}
