//! Integration tests for document parsing and validation.

use pdf_scalpel::{classify, Document, Error};
use regex::bytes::Regex;
use tempfile::tempdir;

/// Build a consistent document from `(number, content)` pairs, with a
/// trailer pointing /Root at `root`.
fn build_document(objects: &[(u32, &str)], root: u32) -> Vec<u8> {
    let mut buf: Vec<u8> = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::new();
    for (number, content) in objects {
        offsets.push((*number, buf.len()));
        buf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", number, content).as_bytes());
    }

    let xref_at = buf.len();
    buf.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    buf.extend_from_slice(b"0000000000 65535 f \n");
    for (_, offset) in &offsets {
        buf.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    buf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            root,
            xref_at
        )
        .as_bytes(),
    );
    buf
}

fn three_objects() -> Vec<u8> {
    build_document(
        &[
            (1, "<< /Type /Catalog /Pages 2 0 R >>"),
            (2, "<< /Type /Pages /Kids [3 0 R] /Count 1 >>"),
            (3, "<< /Type /Page /Parent 2 0 R >>"),
        ],
        1,
    )
}

mod parsing_tests {
    use super::*;

    #[test]
    fn test_objects_are_indexed_in_file_order() {
        let doc = Document::from_bytes(three_objects()).unwrap();
        let numbers: Vec<u32> = doc.objects().iter().map(|o| o.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_object_content_span_excludes_keywords() {
        let doc = Document::from_bytes(three_objects()).unwrap();
        let obj = doc.object(3).unwrap();
        let content = obj.content.bytes(doc.bytes());
        assert_eq!(content, b"<< /Type /Page /Parent 2 0 R >>");
    }

    #[test]
    fn test_object_children_classify() {
        let doc = Document::from_bytes(three_objects()).unwrap();
        let obj = doc.object(2).unwrap();
        let children = obj.children(doc.bytes()).unwrap();
        assert_eq!(children.len(), 1);
        assert!(children[0].is_dictionary());

        let entries = classify::dictionary_entries(doc.bytes(), &children[0]).unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries[1].1.is_array());
    }

    #[test]
    fn test_references_found_inside_arrays() {
        let doc = Document::from_bytes(three_objects()).unwrap();
        let refs = doc.object(2).unwrap().references(doc.bytes()).unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].as_reference(), Some(3));
    }

    #[test]
    fn test_xref_entries_match_declared_count() {
        let doc = Document::from_bytes(three_objects()).unwrap();
        assert_eq!(doc.xref().numbered_entries().len(), 4);
        assert_eq!(doc.xref().trailer.size(doc.bytes()).unwrap(), Some(4));
    }

    #[test]
    fn test_missing_header_is_rejected() {
        let err = Document::from_bytes(b"1 0 obj\nnull\nendobj\n".to_vec()).unwrap_err();
        assert!(matches!(err, Error::InvalidHeader));
    }

    #[test]
    fn test_filtered_document_is_rejected() {
        let data = build_document(
            &[(1, "<< /Length 3 /Filter /FlateDecode >>\nstream\nxyz\nendstream")],
            1,
        );
        let err = Document::from_bytes(data).unwrap_err();
        assert!(matches!(err, Error::CompressedInput(_)));
    }

    #[test]
    fn test_document_without_xref_is_rejected() {
        let err = Document::from_bytes(b"%PDF-1.4\n1 0 obj\nnull\nendobj\n".to_vec()).unwrap_err();
        assert!(matches!(err, Error::ParseError { .. }));
    }
}

mod validation_tests {
    use super::*;

    #[test]
    fn test_consistent_document_validates() {
        let doc = Document::from_bytes(three_objects()).unwrap();
        assert!(doc.validate());
    }

    #[test]
    fn test_stale_offset_fails() {
        let mut data = three_objects();
        let pos = data
            .windows(20)
            .position(|w| w.ends_with(b" 00000 n \n"))
            .unwrap();
        data[pos + 1] = b'9';
        assert!(!Document::from_bytes(data).unwrap().validate());
    }

    #[test]
    fn test_missing_entry_fails() {
        // Declare and carry one entry fewer than there are objects.
        let mut data = build_document(
            &[(1, "<< /Type /Catalog >>"), (2, "null")],
            1,
        );
        let pos = data.windows(4).position(|w| w == b"0 3\n").unwrap();
        data[pos + 2] = b'2';
        let entry_at = data
            .windows(20)
            .rposition(|w| w.ends_with(b" 00000 n \n"))
            .unwrap();
        data.drain(entry_at..entry_at + 20);
        assert!(!Document::from_bytes(data).unwrap().validate());
    }
}

mod lookup_tests {
    use super::*;

    #[test]
    fn test_root_resolves_to_catalog() {
        let doc = Document::from_bytes(three_objects()).unwrap();
        let root = doc.root().unwrap().unwrap();
        assert_eq!(root.number, 1);
    }

    #[test]
    fn test_root_missing_destination_is_none() {
        let data = build_document(&[(1, "<< /Type /Catalog >>")], 9);
        let doc = Document::from_bytes(data).unwrap();
        assert!(doc.root().unwrap().is_none());
    }

    #[test]
    fn test_find_objects_by_pattern() {
        let doc = Document::from_bytes(three_objects()).unwrap();
        let re = Regex::new(r"/Type /Page[^s]").unwrap();
        let hits = doc.find_objects(&re);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].number, 3);
    }
}

mod io_tests {
    use super::*;

    #[test]
    fn test_open_and_save_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.pdf");
        std::fs::write(&path, three_objects()).unwrap();

        let doc = Document::open(&path).unwrap();
        assert!(doc.validate());

        let copy = dir.path().join("copy.pdf");
        doc.save(&copy).unwrap();
        assert_eq!(std::fs::read(&copy).unwrap(), three_objects());
    }

    #[test]
    fn test_open_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = Document::open(dir.path().join("absent.pdf")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
