//! In-memory source that replays a fixed partition of bytes.

use super::{ByteSource, PendingRead, ReadResult};
use crate::pending::Pending;
use std::collections::VecDeque;

/// A [`ByteSource`] over bytes already in memory.
///
/// Every read completes immediately. Useful for feeding the same input
/// under different chunkings.
#[derive(Debug, Clone)]
pub struct ChunkedSource {
    chunks: VecDeque<Vec<u8>>,
    /// Deliver the last chunk together with the end signal.
    end_with_last: bool,
    reads: usize,
    releases: usize,
}

impl ChunkedSource {
    /// Split `bytes` into chunks of at most `chunk_size` bytes.
    ///
    /// A `chunk_size` of 0 is treated as 1.
    pub fn new(bytes: impl Into<Vec<u8>>, chunk_size: usize) -> Self {
        let bytes = bytes.into();
        let chunks = bytes.chunks(chunk_size.max(1)).map(<[u8]>::to_vec).collect();
        Self::from_parts(chunks)
    }

    /// Deliver `bytes` one byte per read.
    pub fn one_byte(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(bytes, 1)
    }

    /// Use an explicit partition. Empty chunks are skipped.
    pub fn from_chunks<I, C>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Vec<u8>>,
    {
        Self::from_parts(
            chunks
                .into_iter()
                .map(Into::into)
                .filter(|chunk| !chunk.is_empty())
                .collect(),
        )
    }

    fn from_parts(chunks: VecDeque<Vec<u8>>) -> Self {
        Self {
            chunks,
            end_with_last: false,
            reads: 0,
            releases: 0,
        }
    }

    /// Report end of input on the same read as the last chunk.
    ///
    /// By default end of input is a separate, empty read.
    #[must_use]
    pub const fn end_with_last_chunk(mut self, enabled: bool) -> Self {
        self.end_with_last = enabled;
        self
    }

    /// Number of reads issued so far.
    pub const fn read_count(&self) -> usize {
        self.reads
    }

    /// Number of times `release` was called.
    pub const fn release_count(&self) -> usize {
        self.releases
    }

    /// Number of chunks not yet delivered.
    pub fn remaining(&self) -> usize {
        self.chunks.len()
    }
}

impl ByteSource for ChunkedSource {
    fn read(&mut self) -> PendingRead {
        self.reads += 1;
        let result = match self.chunks.pop_front() {
            Some(chunk) if self.end_with_last && self.chunks.is_empty() => {
                ReadResult::End(Some(chunk))
            }
            Some(chunk) => ReadResult::Chunk(chunk),
            None => ReadResult::End(None),
        };
        Pending::ready(Ok(result))
    }

    fn release(&mut self) {
        self.releases += 1;
    }
}
