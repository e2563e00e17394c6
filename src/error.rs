//! Error types for stream segmentation.
//!
//! Invalid UTF-8 is never an error here: the decoder substitutes U+FFFD
//! and carries on. Only cancellation and byte source failures end a
//! stream abnormally.

use crate::cancel::CancelReason;
use std::io;
use thiserror::Error;

/// Fatal errors that terminate a [`GraphemeStream`](crate::GraphemeStream).
#[derive(Error, Debug)]
pub enum StreamError {
    /// The cancellation token fired.
    #[error("operation cancelled: {reason}")]
    Cancelled {
        /// The reason the token was cancelled with.
        reason: CancelReason,
    },

    /// The byte source reported a read failure.
    #[error("byte source read failed: {0}")]
    Source(#[from] io::Error),

    /// The byte source dropped a pending read without completing it.
    #[error("byte source abandoned a pending read")]
    SourceAbandoned,
}

impl StreamError {
    /// Check if this error came from cancellation.
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// The cancellation reason, if this error came from cancellation.
    pub const fn cancel_reason(&self) -> Option<&CancelReason> {
        match self {
            Self::Cancelled { reason } => Some(reason),
            _ => None,
        }
    }
}

/// Outcome of a guarded wait that did not produce a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    /// The token fired before the operation completed.
    #[error("operation cancelled: {0}")]
    Cancelled(CancelReason),

    /// The operation's completer was dropped without a value.
    #[error("pending operation abandoned")]
    Abandoned,
}

impl From<GuardError> for StreamError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::Cancelled(reason) => Self::Cancelled { reason },
            GuardError::Abandoned => Self::SourceAbandoned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_error_conversion() {
        let err: StreamError = GuardError::Cancelled(CancelReason::new("stop")).into();
        assert!(err.is_cancelled());
        assert_eq!(err.cancel_reason().map(CancelReason::as_str), Some("stop"));

        let err: StreamError = GuardError::Abandoned.into();
        assert!(matches!(err, StreamError::SourceAbandoned));
        assert!(err.cancel_reason().is_none());
    }

    #[test]
    fn test_error_display() {
        let err = StreamError::from(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
        assert_eq!(err.to_string(), "byte source read failed: gone");

        let err = StreamError::Cancelled {
            reason: CancelReason::new("timeout"),
        };
        assert_eq!(err.to_string(), "operation cancelled: timeout");
    }
}
