use serde::Serialize;

/// A contiguous stretch of residues whose motif probability reached the threshold.
///
/// `start` and `end` are 1-based and inclusive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    pub start: usize,
    pub end: usize,
    pub subsequence: String,
    pub peak_probability: f64,
}

impl Region {
    pub fn len(&self) -> usize {
        self.end + 1 - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}
