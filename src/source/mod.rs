//! Byte sources: pull-based producers of byte chunks.
//!
//! A [`ByteSource`] hands out one [`PendingRead`] per call. The read may
//! already be complete (in-memory sources) or be completed later by a
//! dedicated actor thread (I/O-backed sources):
//!
//! ```text
//! ┌────────────────┐   Completer    ┌──────────────┐
//! │ GraphemeStream │ ─────────────▶ │ Source Actor │ ──▶ io::Read
//! │                │ ◀───────────── │   (thread)   │
//! └────────────────┘   ReadResult   └──────────────┘
//! ```
//!
//! At most one read is in flight at a time: the stream waits for (or
//! abandons) each read before issuing the next.

mod actor;
mod chunked;
mod paced;
mod reader;

pub use actor::ActorSource;
pub use chunked::ChunkedSource;
pub use paced::PacedSource;
pub use reader::{ReaderConfig, ReaderSource};

use crate::pending::Pending;
use std::io;

/// Outcome of a single successful read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadResult {
    /// More input follows this chunk.
    Chunk(Vec<u8>),
    /// End of input, optionally with one last chunk.
    End(Option<Vec<u8>>),
}

impl ReadResult {
    /// Check if this result signals end of input.
    pub const fn is_end(&self) -> bool {
        matches!(self, Self::End(_))
    }

    /// Get the bytes carried by this result, if any.
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Chunk(bytes) | Self::End(Some(bytes)) => bytes,
            Self::End(None) => &[],
        }
    }
}

/// An in-flight read.
pub type PendingRead = Pending<io::Result<ReadResult>>;

/// A pull-based producer of byte chunks.
pub trait ByteSource {
    /// Start the next read.
    ///
    /// Must eventually report [`ReadResult::End`]. Callers never issue a
    /// new read while a previous one is still pending.
    fn read(&mut self) -> PendingRead;

    /// Free underlying resources.
    ///
    /// Must tolerate being called when nothing was ever read, and being
    /// called more than once.
    fn release(&mut self) {}
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn read(&mut self) -> PendingRead {
        (**self).read()
    }

    fn release(&mut self) {
        (**self).release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_result_bytes() {
        assert_eq!(ReadResult::Chunk(vec![1, 2]).bytes(), &[1, 2]);
        assert_eq!(ReadResult::End(Some(vec![3])).bytes(), &[3]);
        assert!(ReadResult::End(None).bytes().is_empty());
        assert!(ReadResult::End(None).is_end());
        assert!(!ReadResult::Chunk(Vec::new()).is_end());
    }

    #[test]
    fn test_boxed_source_delegates() {
        let mut source: Box<dyn ByteSource> = Box::new(ChunkedSource::new(b"ab".to_vec(), 1));
        assert_eq!(
            source.read().wait().unwrap().unwrap(),
            ReadResult::Chunk(b"a".to_vec())
        );
        source.release();
    }
}
