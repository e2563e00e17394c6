//! Grapheme Stream: incremental re-segmentation of a chunked byte stream.
//!
//! Each round reads one chunk, decodes it onto the pending text and
//! re-segments that text. Every cluster except the last is final; the
//! last one is held back because the next bytes may still extend it (a
//! combining mark, a ZWJ continuation, the second half of a flag). At end
//! of input nothing can extend the tail any more, so everything left is
//! emitted.
//!
//! # Usage
//!
//! ```
//! use grapheme_stream::{read_grapheme_clusters, ChunkedSource};
//!
//! let mut source = ChunkedSource::one_byte("e\u{301}👍".as_bytes());
//! let clusters: Result<Vec<String>, _> = read_grapheme_clusters(&mut source, None).collect();
//! assert_eq!(clusters.unwrap(), vec!["e\u{301}", "👍"]);
//! ```

mod buffer;
mod state;

pub use buffer::PendingBuffer;
pub use state::{StreamState, StreamStats};

use crate::cancel::{CancellationGuard, CancellationToken};
use crate::decoder::{Decoder, Utf8Decoder};
use crate::error::{GuardError, StreamError};
use crate::segmenter::{GraphemeSegmenter, Segmenter};
use crate::source::{ByteSource, ReadResult};
use std::collections::VecDeque;
use std::io;
use std::iter::FusedIterator;
use tracing::{debug, trace, warn};

/// Configuration for the default decoder and segmenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    /// Use extended rather than legacy grapheme clusters.
    pub extended_graphemes: bool,
    /// Drop a leading UTF-8 byte order mark.
    pub strip_bom: bool,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            extended_graphemes: true,
            strip_bom: true,
        }
    }
}

/// Read grapheme clusters from `source` with the default decoder and
/// segmenter, optionally cancellable.
pub fn read_grapheme_clusters<'a, S>(
    source: &'a mut S,
    token: Option<&'a CancellationToken>,
) -> GraphemeStream<'a, S>
where
    S: ByteSource + ?Sized,
{
    let stream = GraphemeStream::new(source);
    match token {
        Some(token) => stream.with_cancellation(token),
        None => stream,
    }
}

/// A lazy, single-pass sequence of grapheme clusters read from a
/// [`ByteSource`].
///
/// Iterating yields `Ok(cluster)` for each cluster in input order. The
/// stream ends with `None` after the last cluster, or with a single
/// `Err` on cancellation or source failure, after which it only yields
/// `None`.
///
/// Each pull triggers at most one source read, and none while clusters
/// from the previous read are still waiting to be handed out. The source
/// and the token are borrowed; the stream releases the source (at most
/// once) when it is cancelled or the source fails, but not on normal
/// completion.
pub struct GraphemeStream<'a, S: ?Sized, D = Utf8Decoder, G = GraphemeSegmenter> {
    source: &'a mut S,
    decoder: D,
    segmenter: G,
    guard: CancellationGuard<'a>,
    /// Decoded text not yet confirmed.
    pending: PendingBuffer,
    /// Confirmed clusters not yet handed out.
    ready: VecDeque<String>,
    state: StreamState,
    released: bool,
    stats: StreamStats,
}

impl<'a, S> GraphemeStream<'a, S>
where
    S: ByteSource + ?Sized,
{
    /// Create a stream with the default decoder and segmenter.
    pub fn new(source: &'a mut S) -> Self {
        Self::with_config(source, StreamConfig::default())
    }

    /// Create a stream with a custom configuration.
    pub fn with_config(source: &'a mut S, config: StreamConfig) -> Self {
        Self::with_collaborators(
            source,
            Utf8Decoder::with_bom_removal(config.strip_bom),
            GraphemeSegmenter::new(config.extended_graphemes),
        )
    }
}

impl<'a, S, D, G> GraphemeStream<'a, S, D, G>
where
    S: ByteSource + ?Sized,
    D: Decoder,
    G: Segmenter,
{
    /// Create a stream with explicit collaborators.
    ///
    /// The stream owns the decoder and segmenter, so independent streams
    /// never share state.
    pub fn with_collaborators(source: &'a mut S, decoder: D, segmenter: G) -> Self {
        Self {
            source,
            decoder,
            segmenter,
            guard: CancellationGuard::default(),
            pending: PendingBuffer::new(),
            ready: VecDeque::new(),
            state: StreamState::Reading,
            released: false,
            stats: StreamStats::default(),
        }
    }

    /// Make the stream cancellable by `token`.
    #[must_use]
    pub fn with_cancellation(mut self, token: &'a CancellationToken) -> Self {
        self.guard = CancellationGuard::new(Some(token));
        self
    }

    /// Get the current lifecycle state.
    pub const fn state(&self) -> StreamState {
        self.state
    }

    /// Get the current counters.
    pub fn stats(&self) -> StreamStats {
        StreamStats {
            pending_bytes: self.pending.len(),
            ..self.stats
        }
    }

    /// The tentative tail: decoded text not yet confirmed as clusters.
    pub fn pending_text(&self) -> &str {
        self.pending.as_str()
    }

    /// Run one read round.
    fn round(&mut self) -> Result<(), StreamError> {
        let guard = self.guard;
        if let Err(err) = guard.checkpoint() {
            return Err(self.abort(err));
        }

        let read = self.source.read();
        let result = match guard.wait(read) {
            Ok(Ok(result)) => result,
            Ok(Err(err)) => return Err(self.fail(err)),
            Err(err) => return Err(self.abort(err)),
        };
        self.stats.reads += 1;

        match result {
            ReadResult::Chunk(bytes) => {
                self.decode(&bytes);
                let boundaries = self.segmenter.boundaries(self.pending.as_str());
                let confirmed = self.pending.take_confirmed(&boundaries);
                debug!(
                    bytes = bytes.len(),
                    confirmed = confirmed.len(),
                    tail = self.pending.len(),
                    "read round"
                );
                self.ready.extend(confirmed);
            }
            ReadResult::End(last) => {
                if let Some(bytes) = last {
                    self.decode(&bytes);
                }
                let rest = self.decoder.flush();
                self.pending.push_str(&rest);
                self.note_malformed();

                let boundaries = self.segmenter.boundaries(self.pending.as_str());
                let remaining = self.pending.take_all(&boundaries);
                debug!(remaining = remaining.len(), "end of input, draining");
                self.ready.extend(remaining);
                self.state = StreamState::Draining;
            }
        }
        Ok(())
    }

    /// Decode a chunk onto the pending text.
    fn decode(&mut self, bytes: &[u8]) {
        self.stats.bytes_read += bytes.len() as u64;
        let text = self.decoder.decode_streaming(bytes);
        self.pending.push_str(&text);
        self.note_malformed();
    }

    fn note_malformed(&mut self) {
        if !self.stats.malformed_input && self.decoder.saw_malformed() {
            self.stats.malformed_input = true;
            debug!("malformed UTF-8 replaced with U+FFFD");
        }
    }

    /// Terminate after cancellation or an abandoned read.
    fn abort(&mut self, err: GuardError) -> StreamError {
        match &err {
            GuardError::Cancelled(reason) => {
                debug!(%reason, discarded = self.ready.len(), "stream cancelled");
                self.state = StreamState::Aborted;
            }
            GuardError::Abandoned => {
                warn!("byte source abandoned a pending read");
                self.state = StreamState::Failed;
            }
        }
        self.terminate();
        err.into()
    }

    /// Terminate after a source read failure.
    fn fail(&mut self, err: io::Error) -> StreamError {
        warn!(error = %err, "byte source read failed");
        self.state = StreamState::Failed;
        self.terminate();
        StreamError::Source(err)
    }

    fn terminate(&mut self) {
        self.ready.clear();
        if !self.released {
            self.released = true;
            self.source.release();
            debug!("released byte source");
        }
    }
}

impl<S, D, G> Iterator for GraphemeStream<'_, S, D, G>
where
    S: ByteSource + ?Sized,
    D: Decoder,
    G: Segmenter,
{
    type Item = Result<String, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.state.is_terminal() {
                return None;
            }

            if !self.ready.is_empty() {
                if let Err(err) = self.guard.checkpoint() {
                    return Some(Err(self.abort(err)));
                }
                let cluster = self.ready.pop_front()?;
                self.stats.clusters_emitted += 1;
                trace!(cluster = %cluster.escape_debug(), "emit cluster");
                return Some(Ok(cluster));
            }

            if self.state == StreamState::Draining {
                debug!(clusters = self.stats.clusters_emitted, "stream finished");
                self.state = StreamState::Done;
                return None;
            }

            if let Err(err) = self.round() {
                return Some(Err(err));
            }
        }
    }
}

impl<S, D, G> FusedIterator for GraphemeStream<'_, S, D, G>
where
    S: ByteSource + ?Sized,
    D: Decoder,
    G: Segmenter,
{
}
