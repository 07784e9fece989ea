//! Reply transmit buffer
//!
//! Filled in one piece right before the transmitter is enabled and drained
//! one byte per transmit-ready event. Loading is refused while bytes are
//! still pending so an in-flight reply can never be overwritten.

use heapless::Vec;

use super::sensor::MAX_REPLY_LEN;

/// Transmit buffer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmitError {
    /// A reply is still being sent
    Busy,
    /// Frame longer than the buffer
    Overflow,
}

/// Fixed-capacity reply buffer with a read cursor
#[derive(Debug, Clone, Default)]
pub struct TransmitBuffer {
    bytes: Vec<u8, MAX_REPLY_LEN>,
    cursor: usize,
}

impl TransmitBuffer {
    /// Create an empty buffer
    pub const fn new() -> Self {
        Self {
            bytes: Vec::new(),
            cursor: 0,
        }
    }

    /// Replace the buffer contents with a new frame
    pub fn load(&mut self, frame: &[u8]) -> Result<(), TransmitError> {
        if self.in_progress() {
            return Err(TransmitError::Busy);
        }
        if frame.len() > MAX_REPLY_LEN {
            return Err(TransmitError::Overflow);
        }
        self.bytes.clear();
        // Length checked above
        let _ = self.bytes.extend_from_slice(frame);
        self.cursor = 0;
        Ok(())
    }

    /// Next byte to send, advancing the cursor
    pub fn next_byte(&mut self) -> Option<u8> {
        let byte = self.bytes.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(byte)
    }

    /// Whether bytes remain to be sent
    pub fn in_progress(&self) -> bool {
        self.cursor < self.bytes.len()
    }

    /// Whether the whole frame has been handed to the line
    pub fn is_finished(&self) -> bool {
        !self.bytes.is_empty() && self.cursor == self.bytes.len()
    }

    /// Discard the frame, sent or not
    pub fn abort(&mut self) {
        self.bytes.clear();
        self.cursor = 0;
    }

    /// Loaded frame
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}
