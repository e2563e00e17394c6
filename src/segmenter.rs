//! Grapheme cluster boundary detection.

use unicode_segmentation::UnicodeSegmentation;

/// Pure text-to-boundaries analysis.
pub trait Segmenter {
    /// Compute cluster boundaries over `text`.
    ///
    /// Returns the byte offset where each cluster starts, followed by
    /// `text.len()`. For `k` clusters that is `k + 1` strictly increasing
    /// offsets beginning with `0`; empty text yields `[0]`.
    fn boundaries(&self, text: &str) -> Vec<usize>;
}

/// UAX #29 grapheme [`Segmenter`] using `unicode-segmentation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphemeSegmenter {
    extended: bool,
}

impl Default for GraphemeSegmenter {
    fn default() -> Self {
        Self::extended()
    }
}

impl GraphemeSegmenter {
    /// Segment into extended grapheme clusters (recommended).
    pub const fn extended() -> Self {
        Self { extended: true }
    }

    /// Segment into legacy grapheme clusters.
    pub const fn legacy() -> Self {
        Self { extended: false }
    }

    /// Create a segmenter with an explicit cluster flavour.
    pub const fn new(extended: bool) -> Self {
        Self { extended }
    }

    /// Check if this segmenter uses extended clusters.
    pub const fn is_extended(&self) -> bool {
        self.extended
    }
}

impl Segmenter for GraphemeSegmenter {
    fn boundaries(&self, text: &str) -> Vec<usize> {
        let mut offsets: Vec<usize> = text
            .grapheme_indices(self.extended)
            .map(|(offset, _)| offset)
            .collect();
        offsets.push(text.len());
        offsets
    }
}
