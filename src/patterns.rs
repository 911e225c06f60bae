//! Byte-level lexical patterns for the uncompressed PDF grammar.
//!
//! A fixed table of named matchers over raw document bytes: header marker,
//! indirect objects, references, streams, the primitive literals, and the
//! xref table grammar. The table is pure data, compiled once on first use,
//! and shared process-wide; matchers never carry state.
//!
//! # Limitation
//!
//! Dictionaries (`<< >>`) and arrays (`[ ]`) nest, and flat patterns cannot
//! pair nested delimiters correctly. The patterns here only locate the
//! delimiter *tokens* ([`DICT_OPEN`], [`DICT_CLOSE`], [`ARRAY_OPEN`],
//! [`ARRAY_CLOSE`]); resolving them into object spans is the job of
//! [`crate::brackets`].

use lazy_static::lazy_static;
use regex::bytes::Regex;

/// PDF whitespace class (NUL, TAB, LF, FF, CR, SPACE), as a pattern fragment.
const WS: &str = r"[\x00\x09\x0A\x0C\x0D\x20]";

lazy_static! {
    /// Document header marker.
    pub static ref HEADER: Regex = Regex::new(r"%PDF").unwrap();

    /// Full indirect object: "N G obj ... endobj" plus trailing newlines.
    ///
    /// Captures: (1) object number, (2) generation, (3) contents with
    /// surrounding newlines trimmed.
    pub static ref OBJECT: Regex =
        Regex::new(r"(?s-u)(\d+) (\d+) obj\n*(.*?)\n*endobj\n+").unwrap();

    /// Indirect object opener only: "N G obj".
    pub static ref OBJECT_OPENER: Regex = Regex::new(r"(\d+) (\d+) obj").unwrap();

    /// Dictionary start token. Token only; see module docs.
    pub static ref DICT_OPEN: Regex = Regex::new(r"<<").unwrap();
    /// Dictionary end token.
    pub static ref DICT_CLOSE: Regex = Regex::new(r">>").unwrap();
    /// Array start token.
    pub static ref ARRAY_OPEN: Regex = Regex::new(r"\[").unwrap();
    /// Array end token.
    pub static ref ARRAY_CLOSE: Regex = Regex::new(r"\]").unwrap();

    /// Reference to an indirect object: "N G R".
    ///
    /// Captures: (1) destination object number, (2) generation.
    pub static ref REFERENCE: Regex =
        Regex::new(&format!(r"(\d+) (\d+) R{WS}*")).unwrap();

    /// Stream body between the "stream" and "endstream" keywords.
    pub static ref STREAM: Regex =
        Regex::new(&format!(r"(?s-u)stream(.*?)endstream{WS}*")).unwrap();

    /// Boolean literal. Captures: (1) the literal.
    pub static ref BOOLEAN: Regex =
        Regex::new(&format!(r"(true|false){WS}*")).unwrap();

    /// Name: a '/' followed by regular characters.
    pub static ref NAME: Regex =
        Regex::new(r"/[^/\x00\x09\x0A\x0C\x0D\x20%<>\[\]\{\}\(\)]+").unwrap();

    /// Null literal.
    pub static ref NULL: Regex = Regex::new(&format!(r"null{WS}*")).unwrap();

    /// Numeric literal: optional sign, digits, at most one decimal point.
    pub static ref NUMERIC: Regex = Regex::new(r"[+-]?\d*\.?\d+").unwrap();

    /// Literal string "(...)" without nested parentheses.
    pub static ref STRING_LITERAL: Regex = Regex::new(r"(?s-u)\([^()]*\)").unwrap();

    /// Hexadecimal string "<...>". The class excludes '<', so dictionary
    /// delimiters never satisfy it.
    pub static ref STRING_HEX: Regex =
        Regex::new(&format!(r"<[0-9A-Fa-f{}]*>", &WS[1..WS.len() - 1])).unwrap();

    /// Xref section: "xref" keyword, one or more blocks of fixed-width
    /// entries, then the trailer dictionary.
    ///
    /// Captures: (1) the block region, (2) the trailer dictionary.
    pub static ref XREF_SECTION: Regex = Regex::new(
        r"(?s-u)xref\n((?:\d+ \d+ ?\n(?:\d{10} \d{5} [nf] \n)+)+)\n*trailer\n*(<<.+>>)\n*"
    )
    .unwrap();

    /// One xref block: "start count" header plus its entry lines.
    ///
    /// Captures: (1) start number, (2) entry count, (3) entry lines.
    pub static ref XREF_BLOCK: Regex =
        Regex::new(r"(\d+) (\d+) ?\n((?:\d{10} \d{5} [nf] \n)+)").unwrap();

    /// One 20-byte xref entry: "<10-digit offset> <5-digit gen> <n|f> \n".
    ///
    /// Captures: (1) offset, (2) generation, (3) in-use flag.
    pub static ref XREF_ENTRY: Regex =
        Regex::new(r"(\d{10}) (\d{5}) ([nf]) \n").unwrap();

    /// Startxref pointer through the end-of-file marker.
    ///
    /// Captures: (1) byte offset of the xref section.
    pub static ref STARTXREF: Regex = Regex::new(r"startxref\n(\d+)\n+%%EOF").unwrap();

    /// A reference or declaration token whose object number is subject to
    /// renumbering: "M G R" or "M G obj".
    ///
    /// Captures: (1) object number, (2) the " G R"/" G obj" tail,
    /// (3) generation.
    pub static ref RENUMBER: Regex = Regex::new(r"(\d+)( (\d+) (?:R|obj))").unwrap();

    /// The trailer's /Size entry.
    pub static ref SIZE_ENTRY: Regex = Regex::new(r"/Size \d+").unwrap();

    /// The trailer's /Root reference. Captures: (1) destination number.
    pub static ref TRAILER_ROOT: Regex = Regex::new(r"/Root (\d+) \d+ R").unwrap();

    /// Recognized stream compression/encoding filter names.
    ///
    /// Any hit makes the input unusable for structural editing; see
    /// [`crate::error::Error::CompressedInput`].
    pub static ref FILTER_NAME: Regex = Regex::new(
        r"/(FlateDecode|LZWDecode|RunLengthDecode|CCITTFaxDecode|JBIG2Decode|DCTDecode|JPXDecode|ASCIIHexDecode|ASCII85Decode|Crypt)"
    )
    .unwrap();
}
