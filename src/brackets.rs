//! Depth-aware matching of nested dictionary and array delimiters.
//!
//! Flat patterns can locate `<<`, `>>`, `[` and `]` tokens but cannot pair
//! them once they nest. This module collects both token kinds inside a
//! span, orders them by position, and scans with a depth counter plus a
//! stack of pending start offsets. Only spans that close at depth zero are
//! reported: those are the maximal, non-overlapping dictionaries or arrays
//! of the region. Nested occurrences are recovered later by re-running the
//! classifier on an accepted span's interior.

use crate::error::{Error, Result};
use crate::patterns;
use crate::span::{find_within, Span};
use regex::bytes::Regex;

/// The two delimiter kinds that nest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// `<< ... >>`
    Dictionary,
    /// `[ ... ]`
    Array,
}

impl Delimiter {
    fn opener(&self) -> &'static Regex {
        match self {
            Delimiter::Dictionary => &patterns::DICT_OPEN,
            Delimiter::Array => &patterns::ARRAY_OPEN,
        }
    }

    fn closer(&self) -> &'static Regex {
        match self {
            Delimiter::Dictionary => &patterns::DICT_CLOSE,
            Delimiter::Array => &patterns::ARRAY_CLOSE,
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Delimiter::Dictionary => "dictionary",
            Delimiter::Array => "array",
        }
    }

    /// Width in bytes of one delimiter token.
    pub(crate) fn token_width(&self) -> usize {
        match self {
            Delimiter::Dictionary => 2,
            Delimiter::Array => 1,
        }
    }
}

/// Find the top-level `kind` spans inside `within`.
///
/// Fails with `MismatchedDelimiters` when start and end token counts
/// disagree, or when an end token appears before any unclosed start.
pub fn match_brackets(buf: &[u8], within: Span, kind: Delimiter) -> Result<Vec<Span>> {
    let starts = find_within(kind.opener(), buf, within)?;
    let ends = find_within(kind.closer(), buf, within)?;

    if starts.len() != ends.len() {
        return Err(Error::MismatchedDelimiters {
            kind: kind.name(),
            starts: starts.len(),
            ends: ends.len(),
        });
    }

    // Merge both token streams into position order.
    let mut tokens: Vec<(Span, bool)> = starts
        .iter()
        .map(|m| (m.span, true))
        .chain(ends.iter().map(|m| (m.span, false)))
        .collect();
    tokens.sort_by_key(|(span, _)| span.start);

    let mut depth = 0usize;
    let mut pending: Vec<usize> = Vec::new();
    let mut top_level = Vec::new();

    for (token, is_start) in tokens {
        if is_start {
            depth += 1;
            pending.push(token.start);
        } else {
            let Some(open_at) = pending.pop() else {
                return Err(Error::MismatchedDelimiters {
                    kind: kind.name(),
                    starts: starts.len(),
                    ends: ends.len(),
                });
            };
            depth -= 1;
            if depth == 0 {
                top_level.push(Span::new(open_at, token.end));
            }
        }
    }

    Ok(top_level)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dicts(buf: &[u8]) -> Result<Vec<Span>> {
        match_brackets(buf, Span::whole(buf), Delimiter::Dictionary)
    }

    fn arrays(buf: &[u8]) -> Result<Vec<Span>> {
        match_brackets(buf, Span::whole(buf), Delimiter::Array)
    }

    #[test]
    fn test_single_dictionary() {
        let buf = b"<< /Type /Page >>";
        let spans = dicts(buf).unwrap();
        assert_eq!(spans, vec![Span::new(0, buf.len())]);
    }

    #[test]
    fn test_nested_dictionary_reports_only_outermost() {
        let buf = b"<< /Resources << /Font << /F1 1 0 R >> >> >>";
        let spans = dicts(buf).unwrap();
        assert_eq!(spans, vec![Span::new(0, buf.len())]);
    }

    #[test]
    fn test_sequential_dictionaries() {
        let buf = b"<< /A 1 >> << /B 2 >>";
        let spans = dicts(buf).unwrap();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0], Span::new(0, 10));
        assert_eq!(spans[1], Span::new(11, 21));
    }

    #[test]
    fn test_nested_arrays() {
        let buf = b"[ [1 2] [3 [4]] ]";
        let spans = arrays(buf).unwrap();
        assert_eq!(spans, vec![Span::new(0, buf.len())]);
    }

    #[test]
    fn test_mismatched_counts() {
        let err = dicts(b"<< /A << /B 1 >>").unwrap_err();
        assert!(matches!(
            err,
            Error::MismatchedDelimiters { kind: "dictionary", starts: 2, ends: 1 }
        ));
    }

    #[test]
    fn test_closer_before_opener() {
        let err = dicts(b">> <<").unwrap_err();
        assert!(matches!(err, Error::MismatchedDelimiters { .. }));
    }

    #[test]
    fn test_array_inside_dictionary_is_independent() {
        // Array matching ignores dictionary tokens entirely.
        let buf = b"<< /Kids [1 0 R 2 0 R] >>";
        let spans = arrays(buf).unwrap();
        assert_eq!(spans, vec![Span::new(9, 22)]);
    }
}
