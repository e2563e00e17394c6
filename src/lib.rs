//! # grapheme-stream
//!
//! Lazily read Unicode grapheme clusters (user-perceived characters, per
//! UAX #29) from a UTF-8 byte stream that arrives in arbitrary chunks.
//!
//! Splitting a stream on raw bytes or code points breaks emoji sequences,
//! combining marks and flags. This crate re-segments the decoded text
//! after every chunk and only hands out clusters that no future byte can
//! change, holding back the last candidate until more input or end of
//! input settles it.
//!
//! ## Core Concepts
//!
//! - **Pull-based**: [`GraphemeStream`] is an iterator; nothing is read
//!   ahead of demand
//! - **One-cluster lookahead**: the tentative tail is retained across reads
//! - **Cooperative cancellation**: a [`CancellationToken`] is honored before
//!   each read, while waiting on a read, and before each cluster
//! - **Actor-backed sources**: blocking readers run on their own thread so
//!   waits stay cancellable
//!
//! ## Example
//!
//! ```rust,no_run
//! use grapheme_stream::{read_grapheme_clusters, CancellationToken, ReaderSource};
//!
//! let mut source = ReaderSource::spawn(std::io::stdin())?;
//! let token = CancellationToken::new();
//!
//! for cluster in read_grapheme_clusters(&mut source, Some(&token)) {
//!     println!("{}", cluster?);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod cancel;
pub mod decoder;
pub mod error;
pub mod pending;
pub mod segmenter;
pub mod source;
pub mod stream;

// Re-exports for convenience
pub use cancel::{CancelReason, CancellationGuard, CancellationToken};
pub use decoder::{Decoder, Utf8Decoder};
pub use error::{GuardError, StreamError};
pub use pending::{Completer, Pending};
pub use segmenter::{GraphemeSegmenter, Segmenter};
pub use source::{
    ActorSource, ByteSource, ChunkedSource, PacedSource, PendingRead, ReadResult, ReaderConfig,
    ReaderSource,
};
pub use stream::{
    read_grapheme_clusters, GraphemeStream, PendingBuffer, StreamConfig, StreamState, StreamStats,
};
