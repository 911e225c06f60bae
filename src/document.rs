//! Document parsing and the in-memory document model.
//!
//! A [`Document`] owns the raw byte buffer of a single-revision,
//! uncompressed document and indexes it: the header marker, every indirect
//! object, and the cross-reference table. All indexing is span-based; the
//! buffer itself is never rewritten here. Editing belongs to
//! [`crate::editor`].

use std::path::Path;

use bytes::Bytes;
use regex::bytes::Regex;

use crate::classify::{classify, parse_u32};
use crate::error::{Error, Result};
use crate::object::DirectObject;
use crate::patterns;
use crate::span::{find_first, find_within, PatternMatch, Span};
use crate::xref::XrefTable;

/// An indirect object: `N G obj ... endobj`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndirectObject {
    /// Object number
    pub number: u32,
    /// Generation number
    pub generation: u32,
    /// Span of the whole definition, opener through the newline run after
    /// `endobj`
    pub span: Span,
    /// Span of the content between the keywords, with surrounding newlines
    /// trimmed
    pub content: Span,
}

impl IndirectObject {
    fn from_match(buf: &[u8], m: &PatternMatch) -> Result<Self> {
        let number = m
            .group(1)
            .map(|s| parse_u32(buf, s))
            .transpose()?
            .ok_or_else(|| Error::ParseError {
                offset: m.span.start,
                reason: "indirect object without a number".to_string(),
            })?;
        let generation = m
            .group(2)
            .map(|s| parse_u32(buf, s))
            .transpose()?
            .unwrap_or(0);
        let content = m.group(3).unwrap_or(Span::new(m.span.end, m.span.end));
        Ok(Self { number, generation, span: m.span, content })
    }

    /// Classify the object's content into its top-level direct objects.
    pub fn children(&self, buf: &[u8]) -> Result<Vec<DirectObject>> {
        classify(buf, self.content)
    }

    /// Every reference inside the object, at any nesting depth, in
    /// left-to-right order.
    pub fn references(&self, buf: &[u8]) -> Result<Vec<DirectObject>> {
        let mut out = Vec::new();
        collect(buf, &self.children(buf)?, &mut out, |o| {
            matches!(o, DirectObject::Reference { .. })
        })?;
        Ok(out)
    }

    /// Every dictionary inside the object, at any nesting depth, outermost
    /// first.
    pub fn dictionaries(&self, buf: &[u8]) -> Result<Vec<DirectObject>> {
        let mut out = Vec::new();
        collect(buf, &self.children(buf)?, &mut out, |o| o.is_dictionary())?;
        Ok(out)
    }
}

fn collect(
    buf: &[u8],
    objects: &[DirectObject],
    out: &mut Vec<DirectObject>,
    keep: fn(&DirectObject) -> bool,
) -> Result<()> {
    for obj in objects {
        if keep(obj) {
            out.push(*obj);
        }
        collect(buf, &obj.children(buf)?, out, keep)?;
    }
    Ok(())
}

/// A parsed single-revision document.
#[derive(Debug, Clone)]
pub struct Document {
    buf: Bytes,
    header_at: usize,
    objects: Vec<IndirectObject>,
    xref: XrefTable,
}

impl Document {
    /// Parse a document from its raw bytes.
    ///
    /// Refuses input that declares a stream filter anywhere: this crate
    /// edits uncompressed bytes only, and a filtered stream would make the
    /// flat patterns unreliable.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let buf = Bytes::from(data);

        if let Some(m) = find_first(&patterns::FILTER_NAME, &buf, Span::whole(&buf))? {
            let name = m.group_bytes(&buf, 1).unwrap_or_else(|| m.bytes(&buf));
            return Err(Error::CompressedInput(
                String::from_utf8_lossy(name).into_owned(),
            ));
        }

        let header = find_first(&patterns::HEADER, &buf, Span::whole(&buf))?
            .ok_or(Error::InvalidHeader)?;
        let header_at = header.span.start;

        let mut objects = Vec::new();
        for m in find_within(&patterns::OBJECT, &buf, Span::whole(&buf))? {
            objects.push(IndirectObject::from_match(&buf, &m)?);
        }

        let xref = XrefTable::parse(&buf)?;

        log::debug!(
            "parsed document: header at byte {}, {} object(s)",
            header_at,
            objects.len()
        );
        Ok(Self { buf, header_at, objects, xref })
    }

    /// Read and parse a document from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_bytes(std::fs::read(path)?)
    }

    /// The raw document bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    /// A cheap owned handle to the document bytes.
    pub fn to_bytes(&self) -> Bytes {
        self.buf.clone()
    }

    /// Write the document bytes to disk.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, &self.buf)?;
        Ok(())
    }

    /// Byte offset of the header marker.
    pub fn header_offset(&self) -> usize {
        self.header_at
    }

    /// All indirect objects, in file order.
    pub fn objects(&self) -> &[IndirectObject] {
        &self.objects
    }

    /// The indirect object numbered `number`, if present.
    pub fn object(&self, number: u32) -> Option<&IndirectObject> {
        self.objects.iter().find(|o| o.number == number)
    }

    /// The cross-reference table.
    pub fn xref(&self) -> &XrefTable {
        &self.xref
    }

    /// The catalog object the trailer's /Root points at, if both the
    /// entry and its destination exist.
    pub fn root(&self) -> Result<Option<&IndirectObject>> {
        Ok(self
            .xref
            .trailer
            .root(&self.buf)?
            .and_then(|n| self.object(n)))
    }

    /// All objects whose content matches `pattern`.
    pub fn find_objects(&self, pattern: &Regex) -> Vec<&IndirectObject> {
        self.objects
            .iter()
            .filter(|o| pattern.is_match(o.content.bytes(&self.buf)))
            .collect()
    }

    /// Check the xref table against the actual layout.
    ///
    /// The numbered entries must equal, as a list, the free-list head
    /// `(0, header offset)` followed by `(number, opener offset)` for each
    /// object in file order. Any extra, missing, reordered, or misplaced
    /// entry fails the check.
    pub fn validate(&self) -> bool {
        let mut expected: Vec<(u32, u32)> = vec![(0, self.header_at as u32)];
        expected.extend(
            self.objects
                .iter()
                .map(|o| (o.number, o.span.start as u32)),
        );

        let actual: Vec<(u32, u32)> = self
            .xref
            .numbered_entries()
            .into_iter()
            .map(|(n, e)| (n, e.offset))
            .collect();

        if expected != actual {
            log::debug!(
                "xref mismatch: expected {:?}, table has {:?}",
                expected,
                actual
            );
            return false;
        }
        true
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    // A minimal consistent document: header at 0, two objects, compact
    // xref. Offsets below line up with the literal bytes.
    pub(crate) fn sample() -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"%PDF-1.4\n");
        let o1 = buf.len();
        buf.extend_from_slice(b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");
        let o2 = buf.len();
        buf.extend_from_slice(b"2 0 obj\n<< /Type /Pages /Kids [] /Count 0 >>\nendobj\n");
        let xref_at = buf.len();
        buf.extend_from_slice(b"xref\n0 3\n");
        buf.extend_from_slice(b"0000000000 65535 f \n");
        buf.extend_from_slice(format!("{:010} 00000 n \n", o1).as_bytes());
        buf.extend_from_slice(format!("{:010} 00000 n \n", o2).as_bytes());
        buf.extend_from_slice(b"trailer\n<< /Size 3 /Root 1 0 R >>\nstartxref\n");
        buf.extend_from_slice(format!("{}\n", xref_at).as_bytes());
        buf.extend_from_slice(b"%%EOF\n");
        buf
    }

    #[test]
    fn test_parse_sample() {
        let doc = Document::from_bytes(sample()).unwrap();
        assert_eq!(doc.header_offset(), 0);
        assert_eq!(doc.objects().len(), 2);
        assert_eq!(doc.object(1).unwrap().number, 1);
        assert!(doc.object(9).is_none());
    }

    #[test]
    fn test_sample_validates() {
        let doc = Document::from_bytes(sample()).unwrap();
        assert!(doc.validate());
    }

    #[test]
    fn test_stale_offset_fails_validation() {
        let mut data = sample();
        // Corrupt the offset digits of object 1's entry.
        let pos = data.windows(20).position(|w| w.ends_with(b" 00000 n \n")).unwrap();
        data[pos + 1] = b'9';
        let doc = Document::from_bytes(data).unwrap();
        assert!(!doc.validate());
    }

    #[test]
    fn test_root_resolves() {
        let data = sample();
        let doc = Document::from_bytes(data).unwrap();
        let root = doc.root().unwrap().unwrap();
        assert_eq!(root.number, 1);
    }

    #[test]
    fn test_filtered_stream_is_refused() {
        let mut data = sample();
        let insert = b"3 0 obj\n<< /Filter /FlateDecode >>\nendobj\n";
        data.splice(9..9, insert.iter().copied());
        let err = Document::from_bytes(data).unwrap_err();
        assert!(matches!(err, Error::CompressedInput(name) if name == "FlateDecode"));
    }

    #[test]
    fn test_missing_header_is_refused() {
        let err = Document::from_bytes(b"1 0 obj\nnull\nendobj\n".to_vec()).unwrap_err();
        assert!(matches!(err, Error::InvalidHeader));
    }

    #[test]
    fn test_object_references() {
        let data = sample();
        let doc = Document::from_bytes(data).unwrap();
        let obj = doc.object(1).unwrap();
        let refs = obj.references(doc.bytes()).unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].as_reference(), Some(2));
    }

    #[test]
    fn test_object_dictionaries_nested() {
        let buf = b"%PDF-1.4\n1 0 obj\n<< /A << /B 1 >> >>\nendobj\nxref\n0 2\n0000000000 65535 f \n0000000009 00000 n \ntrailer\n<< /Size 2 /Root 1 0 R >>\nstartxref\n45\n%%EOF\n";
        let doc = Document::from_bytes(buf.to_vec()).unwrap();
        let dicts = doc.object(1).unwrap().dictionaries(doc.bytes()).unwrap();
        assert_eq!(dicts.len(), 2);
        assert!(dicts[0].span().contains(dicts[1].span()));
    }

    #[test]
    fn test_find_objects() {
        let data = sample();
        let doc = Document::from_bytes(data).unwrap();
        let re = Regex::new(r"/Catalog").unwrap();
        let hits = doc.find_objects(&re);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].number, 1);
    }
}
