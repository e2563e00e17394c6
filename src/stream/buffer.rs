//! Decoded text awaiting confirmation.

/// Decoded text that has not yet been emitted.
///
/// Always a suffix of everything decoded so far, and never contains a
/// cluster that was already handed out.
#[derive(Debug, Clone, Default)]
pub struct PendingBuffer {
    text: String,
}

impl PendingBuffer {
    /// Create an empty buffer.
    pub const fn new() -> Self {
        Self {
            text: String::new(),
        }
    }

    /// Append freshly decoded text.
    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// View the buffered text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Remove every cluster except the last and return them in order.
    ///
    /// `boundaries` must come from segmenting the current contents. With
    /// fewer than two clusters nothing is confirmed and the buffer is left
    /// untouched; otherwise the last cluster stays as the tentative tail.
    pub fn take_confirmed(&mut self, boundaries: &[usize]) -> Vec<String> {
        // k clusters are described by k + 1 offsets
        if boundaries.len() < 3 {
            return Vec::new();
        }
        let tail_start = boundaries[boundaries.len() - 2];
        let clusters = self.slice_clusters(&boundaries[..boundaries.len() - 1]);
        self.text.drain(..tail_start);
        clusters
    }

    /// Remove and return every cluster, leaving the buffer empty.
    pub fn take_all(&mut self, boundaries: &[usize]) -> Vec<String> {
        let clusters = self.slice_clusters(boundaries);
        self.text.clear();
        clusters
    }

    fn slice_clusters(&self, boundaries: &[usize]) -> Vec<String> {
        debug_assert!(boundaries.windows(2).all(|pair| pair[0] < pair[1]));
        boundaries
            .windows(2)
            .map(|pair| self.text[pair[0]..pair[1]].to_owned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmenter::{GraphemeSegmenter, Segmenter};

    fn buffer_with(text: &str) -> PendingBuffer {
        let mut buffer = PendingBuffer::new();
        buffer.push_str(text);
        buffer
    }

    #[test]
    fn test_single_cluster_is_retained() {
        let mut buffer = buffer_with("a");
        let boundaries = GraphemeSegmenter::default().boundaries(buffer.as_str());
        assert!(buffer.take_confirmed(&boundaries).is_empty());
        assert_eq!(buffer.as_str(), "a");
    }

    #[test]
    fn test_empty_buffer_confirms_nothing() {
        let mut buffer = PendingBuffer::new();
        let boundaries = GraphemeSegmenter::default().boundaries(buffer.as_str());
        assert!(buffer.take_confirmed(&boundaries).is_empty());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_tail_is_retained() {
        let mut buffer = buffer_with("ab\u{1F469}");
        let boundaries = GraphemeSegmenter::default().boundaries(buffer.as_str());
        assert_eq!(buffer.take_confirmed(&boundaries), vec!["a", "b"]);
        assert_eq!(buffer.as_str(), "\u{1F469}");
        assert_eq!(buffer.len(), 4);
    }

    #[test]
    fn test_tail_extends_across_appends() {
        let mut buffer = buffer_with("xe");
        let segmenter = GraphemeSegmenter::default();

        let boundaries = segmenter.boundaries(buffer.as_str());
        assert_eq!(buffer.take_confirmed(&boundaries), vec!["x"]);

        // A combining acute joins the retained "e"
        buffer.push_str("\u{301}y");
        let boundaries = segmenter.boundaries(buffer.as_str());
        assert_eq!(buffer.take_confirmed(&boundaries), vec!["e\u{301}"]);
        assert_eq!(buffer.as_str(), "y");
    }

    #[test]
    fn test_take_all() {
        let mut buffer = buffer_with("hi");
        let boundaries = GraphemeSegmenter::default().boundaries(buffer.as_str());
        assert_eq!(buffer.take_all(&boundaries), vec!["h", "i"]);
        assert!(buffer.is_empty());

        assert!(buffer.take_all(&[0]).is_empty());
    }
}
