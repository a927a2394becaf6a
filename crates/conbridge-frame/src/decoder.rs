use bytes::BytesMut;
use tracing::trace;

use crate::codec::{decode_frame, Frame};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Incremental frame decoder with a persistent partial-frame buffer.
///
/// Lives for the whole receive loop: each physical read is appended with
/// [`extend`](Self::extend), complete frames are drained with
/// [`next_frame`](Self::next_frame), and an unterminated remainder is
/// carried over to the next read. Inbound writes are not chunked 1:1 with
/// logical frames on the stream, so a frame whose bytes straddle two reads
/// must still come out whole.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buf: BytesMut,
}

impl FrameDecoder {
    /// Create an empty decoder.
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Append the bytes of one physical read.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
        trace!(added = bytes.len(), buffered = self.buf.len(), "decoder fed");
    }

    /// Drain the next complete frame, if one is buffered.
    pub fn next_frame(&mut self) -> Option<Frame> {
        decode_frame(&mut self.buf)
    }

    /// Bytes buffered but not yet terminated.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}
