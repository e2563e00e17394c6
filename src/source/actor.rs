//! Source Actor: Dedicated thread that performs reads on demand.
//!
//! The actor waits for a read request, produces exactly one
//! [`ReadResult`] for it, and goes back to waiting. It never reads ahead.
//! Releasing the source stops the actor after its current read; a read
//! that is already blocked cannot be interrupted, so its result is simply
//! discarded.

use super::{ByteSource, PendingRead, ReadResult};
use crate::pending::{Completer, Pending};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::trace;

type ReadRequest = Completer<io::Result<ReadResult>>;

/// A [`ByteSource`] whose reads run on a dedicated thread.
pub struct ActorSource {
    /// Request channel; `None` once released.
    requests: Option<Sender<ReadRequest>>,
    /// Handle to the actor thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl std::fmt::Debug for ActorSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActorSource")
            .field("released", &self.is_released())
            .finish_non_exhaustive()
    }
}

impl ActorSource {
    /// Spawn the actor thread.
    ///
    /// # Arguments
    ///
    /// * `name` - Thread name.
    /// * `produce` - Called once per read request on the actor thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS fails to spawn the thread.
    pub fn spawn<F>(name: &str, produce: F) -> io::Result<Self>
    where
        F: FnMut() -> io::Result<ReadResult> + Send + 'static,
    {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        // Capacity 1: at most one read in flight
        let (request_tx, request_rx) = bounded::<ReadRequest>(1);

        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                Self::run_loop(&request_rx, &shutdown_clone, produce);
            })?;

        Ok(Self {
            requests: Some(request_tx),
            handle: Some(handle),
            shutdown,
        })
    }

    /// Check if the source has been released.
    pub fn is_released(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    /// Release the source and wait for the actor thread to finish.
    ///
    /// Blocks until any read already in progress returns.
    pub fn join(mut self) {
        self.release();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main actor loop.
    fn run_loop<F>(requests: &Receiver<ReadRequest>, shutdown: &AtomicBool, mut produce: F)
    where
        F: FnMut() -> io::Result<ReadResult>,
    {
        trace!(thread = ?thread::current().name(), "source actor started");

        // Ends when the request sender is dropped
        for request in requests {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            let result = produce();
            let finished = !matches!(result, Ok(ReadResult::Chunk(_)));

            if !request.complete(result) {
                trace!("read result discarded by requester");
            }
            if finished {
                break;
            }
        }

        trace!(thread = ?thread::current().name(), "source actor stopped");
    }
}

impl ByteSource for ActorSource {
    fn read(&mut self) -> PendingRead {
        let Some(requests) = &self.requests else {
            return Pending::ready(Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "byte source already released",
            )));
        };

        let (completer, pending) = Pending::channel();
        // If the actor has exited the request is dropped, which the
        // requester observes as an abandoned read.
        let _ = requests.send(completer);
        pending
    }

    fn release(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        self.requests.take();
    }
}

impl Drop for ActorSource {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GuardError;

    fn counter_source(limit: u8) -> ActorSource {
        let mut next = 0u8;
        ActorSource::spawn("test-actor", move || {
            next += 1;
            if next > limit {
                Ok(ReadResult::End(None))
            } else {
                Ok(ReadResult::Chunk(vec![next]))
            }
        })
        .unwrap()
    }

    #[test]
    fn test_actor_reads_on_demand() {
        let mut source = counter_source(2);
        assert_eq!(source.read().wait().unwrap().unwrap(), ReadResult::Chunk(vec![1]));
        assert_eq!(source.read().wait().unwrap().unwrap(), ReadResult::Chunk(vec![2]));
        assert_eq!(source.read().wait().unwrap().unwrap(), ReadResult::End(None));

        // The actor exits after end of input
        assert_eq!(source.read().wait().unwrap_err(), GuardError::Abandoned);
        source.join();
    }

    #[test]
    fn test_actor_read_after_release() {
        let mut source = counter_source(5);
        source.release();
        source.release();
        assert!(source.is_released());

        let err = source.read().wait().unwrap().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotConnected);
        source.join();
    }

    #[test]
    fn test_actor_propagates_errors() {
        let mut source = ActorSource::spawn("test-actor-err", || {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
        })
        .unwrap();

        let err = source.read().wait().unwrap().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
        source.join();
    }
}
