//! Zero-copy byte spans and span-restricted pattern searching.
//!
//! Every parse result in this crate is a [`Span`] into the owned document
//! buffer, expressed in the original document's coordinate system. Searching
//! inside a sub-region never copies bytes: the matcher runs on a borrowed
//! slice and all reported positions are translated back by the region's
//! start offset.

use crate::error::{Error, Result};
use regex::bytes::Regex;

/// A byte range `[start, end)` into a document buffer.
///
/// A parent span may contain a child span but must never partially
/// intersect one (non-crossing invariant); the classifier relies on this
/// when it rejects overlapping candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    /// Start offset, inclusive
    pub start: usize,
    /// End offset, exclusive
    pub end: usize,
}

impl Span {
    /// Create a new span. `start` must not exceed `end`.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {} exceeds end {}", start, end);
        Self { start, end }
    }

    /// Span covering an entire buffer.
    pub fn whole(buf: &[u8]) -> Self {
        Self::new(0, buf.len())
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers zero bytes.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `other` lies entirely within this span.
    pub fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether the two spans share at least one byte.
    pub fn overlaps(&self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The bytes this span covers.
    pub fn bytes<'a>(&self, buf: &'a [u8]) -> &'a [u8] {
        &buf[self.start..self.end]
    }

    /// The interior after removing `width` delimiter bytes from both ends.
    pub fn interior(&self, width: usize) -> Span {
        Span::new(self.start + width, self.end - width)
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A pattern match with its overall span and capture-group spans, all in
/// document coordinates.
#[derive(Debug, Clone)]
pub struct PatternMatch {
    /// Span of the whole match
    pub span: Span,
    groups: Vec<Option<Span>>,
}

impl PatternMatch {
    /// Span of capture group `index` (1-based, like the patterns document).
    pub fn group(&self, index: usize) -> Option<Span> {
        self.groups.get(index.checked_sub(1)?).copied().flatten()
    }

    /// Bytes of capture group `index`.
    pub fn group_bytes<'a>(&self, buf: &'a [u8], index: usize) -> Option<&'a [u8]> {
        self.group(index).map(|s| s.bytes(buf))
    }

    /// Bytes of the whole match.
    pub fn bytes<'a>(&self, buf: &'a [u8]) -> &'a [u8] {
        self.span.bytes(buf)
    }
}

/// Run `pattern` over the bytes of `within` only, translating every
/// reported position by `within.start`.
///
/// Returns `SpanOutOfBounds` if `within` is not contained in the buffer.
pub fn find_within(pattern: &Regex, buf: &[u8], within: Span) -> Result<Vec<PatternMatch>> {
    if within.end > buf.len() || within.start > within.end {
        return Err(Error::SpanOutOfBounds {
            start: within.start,
            end: within.end,
            len: buf.len(),
        });
    }

    let region = &buf[within.start..within.end];
    let mut out = Vec::new();
    for caps in pattern.captures_iter(region) {
        let Some(overall) = caps.get(0) else { continue };
        let groups = (1..caps.len())
            .map(|i| {
                caps.get(i)
                    .map(|m| Span::new(m.start() + within.start, m.end() + within.start))
            })
            .collect();
        out.push(PatternMatch {
            span: Span::new(overall.start() + within.start, overall.end() + within.start),
            groups,
        });
    }
    Ok(out)
}

/// Like [`find_within`], but stops after the first match.
pub fn find_first(pattern: &Regex, buf: &[u8], within: Span) -> Result<Option<PatternMatch>> {
    if within.end > buf.len() || within.start > within.end {
        return Err(Error::SpanOutOfBounds {
            start: within.start,
            end: within.end,
            len: buf.len(),
        });
    }

    let region = &buf[within.start..within.end];
    let Some(caps) = pattern.captures(region) else {
        return Ok(None);
    };
    let Some(overall) = caps.get(0) else {
        return Ok(None);
    };
    let groups = (1..caps.len())
        .map(|i| {
            caps.get(i)
                .map(|m| Span::new(m.start() + within.start, m.end() + within.start))
        })
        .collect();
    Ok(Some(PatternMatch {
        span: Span::new(overall.start() + within.start, overall.end() + within.start),
        groups,
    }))
}

/// Produce a new buffer with the given spans deleted.
///
/// Overlapping and duplicate spans are merged before deletion, so callers
/// may pass ranges in any order. The input buffer is untouched.
pub fn splice_out(buf: &[u8], spans: &[Span]) -> Vec<u8> {
    let mut sorted: Vec<Span> = spans.iter().copied().filter(|s| !s.is_empty()).collect();
    sorted.sort();

    let mut merged: Vec<Span> = Vec::with_capacity(sorted.len());
    for span in sorted {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }

    let mut out = Vec::with_capacity(buf.len());
    let mut cursor = 0;
    for span in merged {
        out.extend_from_slice(&buf[cursor..span.start]);
        cursor = span.end;
    }
    out.extend_from_slice(&buf[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns;

    #[test]
    fn test_span_contains_and_overlaps() {
        let outer = Span::new(10, 50);
        let inner = Span::new(20, 30);
        let crossing = Span::new(40, 60);
        let disjoint = Span::new(50, 60);

        assert!(outer.contains(inner));
        assert!(outer.overlaps(inner));
        assert!(!outer.contains(crossing));
        assert!(outer.overlaps(crossing));
        assert!(!outer.overlaps(disjoint));
    }

    #[test]
    fn test_find_within_translates_offsets() {
        let buf = b"xxxx5 0 Ryyyy";
        let matches = find_within(&patterns::REFERENCE, buf, Span::new(4, 9)).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].span, Span::new(4, 9));
        assert_eq!(matches[0].group_bytes(buf, 1), Some(&b"5"[..]));
    }

    #[test]
    fn test_find_within_sees_only_the_region() {
        let buf = b"1 0 R and 2 0 R";
        let matches = find_within(&patterns::REFERENCE, buf, Span::new(0, 5)).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].group_bytes(buf, 1), Some(&b"1"[..]));
    }

    #[test]
    fn test_find_within_rejects_out_of_bounds() {
        let buf = b"1 0 R";
        let err = find_within(&patterns::REFERENCE, buf, Span::new(0, 99)).unwrap_err();
        assert!(matches!(err, crate::error::Error::SpanOutOfBounds { .. }));
    }

    #[test]
    fn test_splice_out_merges_overlaps() {
        let buf = b"abcdefghij";
        let out = splice_out(buf, &[Span::new(2, 5), Span::new(4, 7), Span::new(4, 6)]);
        assert_eq!(out, b"abhij");
    }

    #[test]
    fn test_splice_out_disjoint_spans() {
        let buf = b"abcdefghij";
        let out = splice_out(buf, &[Span::new(8, 10), Span::new(0, 2)]);
        assert_eq!(out, b"cdefgh");
    }

    #[test]
    fn test_splice_out_empty_input() {
        assert_eq!(splice_out(b"abc", &[]), b"abc");
    }
}
