//! Buffering decoder for MLLP frames.

use crate::error::ProtocolError;
use crate::frame::{self, TRAILER};
use bytes::BytesMut;

/// Reassembles MLLP frames from stream reads.
///
/// MLLP is delimiter-framed: a frame is complete once the end-block +
/// carriage-return trailer has arrived. TCP preserves no message boundaries,
/// so a single frame may span several reads and the decoder buffers partial
/// data until the trailer shows up.
pub struct Decoder {
    buffer: BytesMut,
    max_size: usize,
}

impl Decoder {
    pub fn new() -> Self {
        Self::with_max_size(crate::MAX_MESSAGE_SIZE)
    }

    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(8192),
            max_size,
        }
    }

    /// Appends data received from the peer.
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Attempts to decode the next complete frame from the buffer.
    ///
    /// Returns `Ok(Some(payload))` with the unwrapped frame interior once a
    /// trailer has been buffered, or `Ok(None)` if more data is needed.
    pub fn decode_frame(&mut self) -> Result<Option<String>, ProtocolError> {
        match find_trailer(&self.buffer) {
            Some(pos) => {
                let framed = self.buffer.split_to(pos + TRAILER.len());
                let text =
                    std::str::from_utf8(&framed).map_err(|_| ProtocolError::InvalidUtf8)?;
                Ok(Some(frame::unwrap(text).to_string()))
            }
            None => {
                if self.buffer.len() > self.max_size {
                    return Err(ProtocolError::FrameTooLarge {
                        size: self.buffer.len(),
                        max: self.max_size,
                    });
                }
                Ok(None)
            }
        }
    }

    /// Returns the number of bytes currently buffered.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Consumes the decoder, leniently unwrapping whatever remains buffered.
    ///
    /// For peers that close the connection instead of terminating the frame.
    /// Returns `Ok(None)` when nothing was received.
    pub fn finish(self) -> Result<Option<String>, ProtocolError> {
        if self.buffer.is_empty() {
            return Ok(None);
        }
        let text =
            std::str::from_utf8(&self.buffer).map_err(|_| ProtocolError::InvalidUtf8)?;
        Ok(Some(frame::unwrap(text).to_string()))
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

fn find_trailer(buf: &[u8]) -> Option<usize> {
    buf.windows(TRAILER.len()).position(|w| w == TRAILER)
}
