//! Incremental UTF-8 decoding.
//!
//! The [`Decoder`] trait is the seam between raw bytes and text. Decoders
//! never fail: malformed input is replaced with U+FFFD, and a multi-byte
//! sequence split across chunks is held back until the rest arrives or the
//! decoder is flushed.

use encoding_rs::{CoderResult, UTF_8};

/// Stateful bytes-to-text conversion across chunk boundaries.
pub trait Decoder {
    /// Decode a chunk, keeping any trailing partial sequence for later.
    fn decode_streaming(&mut self, bytes: &[u8]) -> String;

    /// Emit whatever is still buffered.
    ///
    /// A truncated trailing sequence becomes a replacement character.
    fn flush(&mut self) -> String;

    /// Whether any malformed input has been replaced so far.
    fn saw_malformed(&self) -> bool {
        false
    }
}

/// UTF-8 [`Decoder`] backed by `encoding_rs`.
///
/// By default a leading UTF-8 byte order mark is removed.
pub struct Utf8Decoder {
    inner: encoding_rs::Decoder,
    strip_bom: bool,
    /// Set after `flush`; the next decode starts a fresh stream.
    finished: bool,
    malformed: bool,
}

impl std::fmt::Debug for Utf8Decoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Utf8Decoder")
            .field("strip_bom", &self.strip_bom)
            .field("finished", &self.finished)
            .field("malformed", &self.malformed)
            .finish_non_exhaustive()
    }
}

impl Default for Utf8Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Utf8Decoder {
    /// Create a decoder that removes a leading BOM.
    pub fn new() -> Self {
        Self::with_bom_removal(true)
    }

    /// Create a decoder with explicit BOM handling.
    pub fn with_bom_removal(strip_bom: bool) -> Self {
        Self {
            inner: Self::fresh(strip_bom),
            strip_bom,
            finished: false,
            malformed: false,
        }
    }

    fn fresh(strip_bom: bool) -> encoding_rs::Decoder {
        if strip_bom {
            UTF_8.new_decoder_with_bom_removal()
        } else {
            UTF_8.new_decoder_without_bom_handling()
        }
    }

    fn decode(&mut self, mut src: &[u8], last: bool) -> String {
        if self.finished {
            self.inner = Self::fresh(self.strip_bom);
            self.finished = false;
        }

        let mut out = String::new();
        loop {
            let needed = self
                .inner
                .max_utf8_buffer_length(src.len())
                .unwrap_or(src.len().saturating_mul(3).saturating_add(4));
            out.reserve(needed);

            let (result, read, replaced) = self.inner.decode_to_string(src, &mut out, last);
            self.malformed |= replaced;
            src = &src[read..];

            match result {
                CoderResult::InputEmpty => break,
                CoderResult::OutputFull => {}
            }
        }

        if last {
            self.finished = true;
        }
        out
    }
}

impl Decoder for Utf8Decoder {
    fn decode_streaming(&mut self, bytes: &[u8]) -> String {
        self.decode(bytes, false)
    }

    fn flush(&mut self) -> String {
        if self.finished {
            return String::new();
        }
        self.decode(&[], true)
    }

    fn saw_malformed(&self) -> bool {
        self.malformed
    }
}
