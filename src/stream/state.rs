//! Lifecycle and counters for a single stream.

/// Where a [`GraphemeStream`](super::GraphemeStream) is in its lifecycle.
///
/// ```text
/// Reading ──▶ Draining ──▶ Done
///    │            │
///    ├────────────┴──▶ Aborted   (cancellation)
///    └──▶ Failed                 (source error)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamState {
    /// Reading chunks and emitting confirmed clusters.
    Reading,
    /// End of input seen; handing out the final clusters.
    Draining,
    /// All input emitted.
    Done,
    /// Stopped by cancellation.
    Aborted,
    /// Stopped by a source failure.
    Failed,
}

impl StreamState {
    /// Check if no further clusters can be produced.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Aborted | Self::Failed)
    }
}

/// Counters for a stream, for debugging/profiling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Reads completed by the source.
    pub reads: u64,
    /// Total bytes received.
    pub bytes_read: u64,
    /// Clusters handed to the consumer.
    pub clusters_emitted: u64,
    /// Bytes of decoded text currently held back.
    pub pending_bytes: usize,
    /// Whether any malformed UTF-8 was replaced.
    pub malformed_input: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!StreamState::Reading.is_terminal());
        assert!(!StreamState::Draining.is_terminal());
        assert!(StreamState::Done.is_terminal());
        assert!(StreamState::Aborted.is_terminal());
        assert!(StreamState::Failed.is_terminal());
    }
}
