//! Byte source over any blocking [`std::io::Read`].

use super::{ActorSource, ByteSource, PendingRead, ReadResult};
use std::io::{self, Read};

/// Configuration for [`ReaderSource`].
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Maximum bytes per read.
    pub chunk_size: usize,
    /// Name of the reader thread.
    pub thread_name: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            chunk_size: 8192,
            thread_name: "grapheme-reader".to_string(),
        }
    }
}

/// A [`ByteSource`] that drives a blocking reader on its own thread.
///
/// Blocking reads (stdin, sockets, pipes) become cancellable from the
/// stream's point of view: the stream stops waiting when its token fires
/// while the reader thread finishes its read in the background.
#[derive(Debug)]
pub struct ReaderSource {
    actor: ActorSource,
}

impl ReaderSource {
    /// Spawn a reader source with default configuration.
    pub fn spawn<R>(reader: R) -> io::Result<Self>
    where
        R: Read + Send + 'static,
    {
        Self::with_config(reader, &ReaderConfig::default())
    }

    /// Spawn a reader source with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader thread cannot be spawned.
    pub fn with_config<R>(mut reader: R, config: &ReaderConfig) -> io::Result<Self>
    where
        R: Read + Send + 'static,
    {
        let mut buf = vec![0u8; config.chunk_size.max(1)];
        let actor = ActorSource::spawn(&config.thread_name, move || read_chunk(&mut reader, &mut buf))?;
        Ok(Self { actor })
    }

    /// Release the source and wait for the reader thread to finish.
    pub fn join(self) {
        self.actor.join();
    }
}

/// Read one chunk, retrying on interruption.
fn read_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<ReadResult> {
    loop {
        match reader.read(buf) {
            Ok(0) => return Ok(ReadResult::End(None)),
            Ok(n) => return Ok(ReadResult::Chunk(buf[..n].to_vec())),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
}

impl ByteSource for ReaderSource {
    fn read(&mut self) -> PendingRead {
        self.actor.read()
    }

    fn release(&mut self) {
        self.actor.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reader_source_chunks() {
        let config = ReaderConfig {
            chunk_size: 4,
            ..ReaderConfig::default()
        };
        let mut source = ReaderSource::with_config(Cursor::new(b"abcdef".to_vec()), &config).unwrap();

        assert_eq!(source.read().wait().unwrap().unwrap(), ReadResult::Chunk(b"abcd".to_vec()));
        assert_eq!(source.read().wait().unwrap().unwrap(), ReadResult::Chunk(b"ef".to_vec()));
        assert_eq!(source.read().wait().unwrap().unwrap(), ReadResult::End(None));
        source.join();
    }

    #[test]
    fn test_read_chunk_retries_interrupted() {
        struct Flaky {
            interrupted: bool,
        }

        impl Read for Flaky {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                if !self.interrupted {
                    self.interrupted = true;
                    return Err(io::Error::from(io::ErrorKind::Interrupted));
                }
                buf[0] = b'z';
                Ok(1)
            }
        }

        let mut buf = [0u8; 8];
        let result = read_chunk(&mut Flaky { interrupted: false }, &mut buf).unwrap();
        assert_eq!(result, ReadResult::Chunk(b"z".to_vec()));
    }
}
