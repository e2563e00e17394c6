//! Paced Source: releases in-memory bytes at a fixed rate.
//!
//! Simulates a slow producer (a network peer, a user typing). Each read
//! is answered by the actor thread after `interval` has passed.

use super::{ActorSource, ByteSource, PendingRead, ReadResult};
use std::collections::VecDeque;
use std::io;
use std::thread;
use std::time::Duration;

/// A [`ByteSource`] that delivers one chunk per `interval`.
#[derive(Debug)]
pub struct PacedSource {
    actor: ActorSource,
}

impl PacedSource {
    /// Spawn a paced source.
    ///
    /// # Arguments
    ///
    /// * `bytes` - The full input.
    /// * `chunk_size` - Bytes per read (0 is treated as 1).
    /// * `interval` - Delay before each read completes.
    ///
    /// # Errors
    ///
    /// Returns an error if the pacing thread cannot be spawned.
    pub fn spawn(bytes: &[u8], chunk_size: usize, interval: Duration) -> io::Result<Self> {
        let mut chunks: VecDeque<Vec<u8>> = bytes
            .chunks(chunk_size.max(1))
            .map(<[u8]>::to_vec)
            .collect();

        let actor = ActorSource::spawn("grapheme-paced", move || {
            thread::sleep(interval);
            Ok(chunks
                .pop_front()
                .map_or(ReadResult::End(None), ReadResult::Chunk))
        })?;
        Ok(Self { actor })
    }

    /// Check if the source has been released.
    pub fn is_released(&self) -> bool {
        self.actor.is_released()
    }

    /// Release the source and wait for the pacing thread to finish.
    pub fn join(self) {
        self.actor.join();
    }
}

impl ByteSource for PacedSource {
    fn read(&mut self) -> PendingRead {
        self.actor.read()
    }

    fn release(&mut self) {
        self.actor.release();
    }
}
