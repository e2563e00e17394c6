//! One-shot handles to in-flight operations.
//!
//! A [`Pending`] is the receiving half of an operation that may already be
//! finished or may be completed later from another thread through its
//! [`Completer`]. Dropping a `Pending` discards the eventual value: a late
//! completion is accepted and thrown away, never an error.

use crate::error::GuardError;
use crossbeam_channel::{bounded, Receiver, Sender};

/// Receiving half of a one-shot operation.
#[derive(Debug)]
pub struct Pending<T> {
    rx: Receiver<T>,
}

/// Completing half of a one-shot operation.
#[derive(Debug)]
pub struct Completer<T> {
    tx: Sender<T>,
}

impl<T> Pending<T> {
    /// Create a linked completer/pending pair.
    pub fn channel() -> (Completer<T>, Self) {
        // Capacity 1: the single completion never blocks the completer
        let (tx, rx) = bounded(1);
        (Completer { tx }, Self { rx })
    }

    /// Create an already-completed operation.
    pub fn ready(value: T) -> Self {
        let (completer, pending) = Self::channel();
        completer.complete(value);
        pending
    }

    /// Block until the operation completes.
    ///
    /// Returns [`GuardError::Abandoned`] if the completer was dropped
    /// without producing a value.
    pub fn wait(self) -> Result<T, GuardError> {
        self.rx.recv().map_err(|_| GuardError::Abandoned)
    }

    /// Check whether a value is already available.
    pub fn is_ready(&self) -> bool {
        !self.rx.is_empty()
    }

    pub(crate) const fn receiver(&self) -> &Receiver<T> {
        &self.rx
    }
}

impl<T> Completer<T> {
    /// Complete the operation.
    ///
    /// Returns `false` if the pending side was already dropped, in which
    /// case the value is discarded.
    pub fn complete(self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_pending_ready() {
        let pending = Pending::ready(7u8);
        assert!(pending.is_ready());
        assert_eq!(pending.wait(), Ok(7));
    }

    #[test]
    fn test_pending_completed_from_thread() {
        let (completer, pending) = Pending::channel();
        assert!(!pending.is_ready());

        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            completer.complete("done")
        });

        assert_eq!(pending.wait(), Ok("done"));
        assert!(handle.join().unwrap());
    }

    #[test]
    fn test_pending_abandoned() {
        let (completer, pending) = Pending::<u32>::channel();
        drop(completer);
        assert_eq!(pending.wait(), Err(GuardError::Abandoned));
    }

    #[test]
    fn test_late_completion_discarded() {
        let (completer, pending) = Pending::channel();
        drop(pending);
        assert!(!completer.complete(1u32));
    }
}
