use crate::error::{Error, Result};

/// Half-open byte interval `[start, end)` of an original source buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DeletionRange {
    pub start: usize,
    pub end: usize,
}

impl DeletionRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Batched deletions over an immutable source buffer.
///
/// Offsets always refer to the original text; deletions are applied in one
/// pass by [`EditBuffer::apply`], so recording order does not matter.
pub struct EditBuffer<'a> {
    source: &'a str,
    deletions: Vec<DeletionRange>,
}

impl<'a> EditBuffer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            deletions: Vec::new(),
        }
    }

    /// Record a deletion of `range`
    pub fn delete(&mut self, range: DeletionRange) {
        self.deletions.push(range);
    }

    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty()
    }

    /// Apply every recorded deletion. Ranges may touch but must not overlap.
    pub fn apply(mut self, label: &str) -> Result<String> {
        self.deletions.sort();

        let invalid = |range: &DeletionRange, reason: &str| Error::Edit {
            label: label.to_string(),
            start: range.start,
            end: range.end,
            reason: reason.to_string(),
        };

        let mut out = String::with_capacity(self.source.len());
        let mut cursor = 0;
        for range in &self.deletions {
            if range.start > range.end || range.end > self.source.len() {
                return Err(invalid(range, "out of bounds"));
            }
            if range.start < cursor {
                return Err(invalid(range, "overlaps an earlier deletion"));
            }
            if !self.source.is_char_boundary(range.start) || !self.source.is_char_boundary(range.end) {
                return Err(invalid(range, "not on a character boundary"));
            }
            out.push_str(&self.source[cursor..range.start]);
            cursor = range.end;
        }
        out.push_str(&self.source[cursor..]);

        Ok(out)
    }
}
