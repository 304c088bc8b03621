//! Byte-range edits over a serialized XML document.
//!
//! Rewrites are expressed as replacements of byte ranges reported by the
//! streaming reader, so every byte outside an edited range is emitted as-is.

use std::ops::Range;

/// An ordered set of non-overlapping replacements over one source buffer.
#[derive(Debug, Default)]
pub struct Splicer {
    edits: Vec<(Range<usize>, String)>,
}

impl Splicer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace `range` of the source with `text`.
    pub fn replace(&mut self, range: Range<usize>, text: impl Into<String>) {
        self.edits.push((range, text.into()));
    }

    /// Insert `text` at offset `at` of the source.
    pub fn insert(&mut self, at: usize, text: impl Into<String>) {
        self.edits.push((at..at, text.into()));
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Apply all edits to `source`.
    ///
    /// Edits are applied in offset order; insertions at the same offset keep
    /// the order they were added in. A range that overlaps an earlier one is
    /// skipped.
    pub fn apply(mut self, source: &[u8]) -> Vec<u8> {
        self.edits.sort_by_key(|(range, _)| range.start);

        let extra: usize = self.edits.iter().map(|(_, text)| text.len()).sum();
        let mut out = Vec::with_capacity(source.len() + extra);
        let mut cursor = 0usize;

        for (range, text) in self.edits {
            if range.start < cursor || range.end > source.len() {
                continue;
            }
            out.extend_from_slice(&source[cursor..range.start]);
            out.extend_from_slice(text.as_bytes());
            cursor = range.end;
        }
        out.extend_from_slice(&source[cursor..]);
        out
    }
}
