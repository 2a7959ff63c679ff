//! Media chunk source capability
//!
//! The codec feed task pulls audio data through [`ChunkSource`] without
//! knowing where the bytes come from — SD card, flash, or a test fixture.
//! Storage access itself is outside the control core; whatever owns the
//! medium implements this trait.

use crate::config::CODEC_CHUNK_LEN;

/// "Produce next chunk or end-of-stream" media source.
pub trait ChunkSource {
    /// Fill `buf` with the next chunk of media data.
    ///
    /// Returns `Some(n)` with the number of bytes written (`1..=buf.len()`),
    /// or `None` once the stream is exhausted. After `None`, subsequent
    /// calls keep returning `None`.
    fn next_chunk(&mut self, buf: &mut [u8]) -> Option<usize>;
}

/// Chunk source over a flash-resident byte slice.
///
/// Serves fixed-size chunks (at most [`CODEC_CHUNK_LEN`] bytes each) until
/// the slice is exhausted. Used for the built-in startup tone and as a
/// deterministic source in tests.
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    /// Create a source over `data`.
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes served so far.
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl ChunkSource for SliceSource<'_> {
    fn next_chunk(&mut self, buf: &mut [u8]) -> Option<usize> {
        let remaining = self.data.len().saturating_sub(self.pos);
        if remaining == 0 {
            return None;
        }
        let n = remaining.min(buf.len()).min(CODEC_CHUNK_LEN);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Some(n)
    }
}
