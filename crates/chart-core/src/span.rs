use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpanError {
    #[error("span end {end} precedes start {start}")]
    Inverted { start: usize, end: usize },
}

/// A contiguous range of source word positions, both ends inclusive.
///
/// Ordered by `(start, end)`, so a `BTreeMap<Span, _>` iterates left to right
/// and shorter spans first for a shared start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Result<Self, SpanError> {
        if end < start {
            return Err(SpanError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// Span covering exactly one word.
    pub fn single(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// `len` words from `start`; `len` must be positive.
    pub(crate) fn from_start_len(start: usize, len: usize) -> Self {
        debug_assert!(len > 0);
        Self {
            start,
            end: start + len - 1,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of words covered. Never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// True if `self` starts where `other` starts and is strictly shorter.
    pub fn is_prefix_of(&self, other: &Span) -> bool {
        self.start == other.start && self.end < other.end
    }

    /// True if `self` ends where `other` ends and is strictly shorter.
    pub fn is_suffix_of(&self, other: &Span) -> bool {
        self.end == other.end && self.start > other.start
    }

    /// True if `other` begins at the word right after `self` ends.
    pub fn adjacent_to(&self, other: &Span) -> bool {
        self.end + 1 == other.start
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{}]", self.start, self.end)
    }
}
