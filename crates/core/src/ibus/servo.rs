//! Servo frame receiver
//!
//! Frame layout (32 bytes):
//!
//! ```text
//! 0x20 0x40 | ch0_lo ch0_hi | ... | ch13_lo ch13_hi | ck_lo ck_hi
//! ```
//!
//! The sync marker is recognized on every byte, so a receiver that joins
//! mid-stream locks on at the next frame start. Channel words are staged in
//! a private buffer and only published as a [`ChannelFrame`] once the
//! checksum validates; a rejected frame never reaches the mixer.

use super::{Checksum, SyncError};

/// Two-byte servo frame marker
pub const SYNC: [u8; 2] = [0x20, 0x40];

/// Channels carried by one servo frame
pub const CHANNEL_COUNT: usize = 14;

/// Total servo frame length including marker and checksum
pub const FRAME_LEN: usize = SYNC.len() + CHANNEL_COUNT * 2 + 2;

/// Channel payload bytes plus the checksum word
const BODY_LEN: u8 = (CHANNEL_COUNT * 2 + 2) as u8;

/// Raw channel values are 12 bits wide
const CHANNEL_MASK: u16 = 0x0FFF;

/// One validated set of channel positions
///
/// Values are raw receiver ticks, nominally 1000..2000 with 1500 at center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelFrame([u16; CHANNEL_COUNT]);

impl ChannelFrame {
    /// Wrap channel values (masked to 12 bits)
    pub fn new(values: [u16; CHANNEL_COUNT]) -> Self {
        Self(values.map(|v| v & CHANNEL_MASK))
    }

    /// Every channel at the same value
    pub fn uniform(value: u16) -> Self {
        Self::new([value; CHANNEL_COUNT])
    }

    /// Raw value of `channel`, or 0 for an index past the frame
    pub fn get(&self, channel: usize) -> u16 {
        self.0.get(channel).copied().unwrap_or(0)
    }

    /// Replace one channel value
    pub fn with(mut self, channel: usize, value: u16) -> Self {
        if let Some(slot) = self.0.get_mut(channel) {
            *slot = value & CHANNEL_MASK;
        }
        self
    }

    /// All channel values in order
    pub fn values(&self) -> &[u16; CHANNEL_COUNT] {
        &self.0
    }

    /// Serialize as a complete wire frame with a valid checksum
    pub fn encode(&self) -> [u8; FRAME_LEN] {
        let mut bytes = [0u8; FRAME_LEN];
        bytes[..2].copy_from_slice(&SYNC);
        for (i, value) in self.0.iter().enumerate() {
            let offset = SYNC.len() + i * 2;
            bytes[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
        }
        let checksum = Checksum::of(&bytes[..FRAME_LEN - 2]);
        bytes[FRAME_LEN - 2..].copy_from_slice(&checksum.to_le_bytes());
        bytes
    }
}

/// Receiver position within the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServoPhase {
    /// Waiting for the sync marker
    Hunting,
    /// `n` body bytes consumed since the marker
    Accumulate(u8),
}

/// Byte-at-a-time servo frame parser
#[derive(Debug, Clone)]
pub struct ServoReceiver {
    phase: ServoPhase,
    previous: u8,
    low: u8,
    staged: [u16; CHANNEL_COUNT],
    checksum: Checksum,
}

impl Default for ServoReceiver {
    fn default() -> Self {
        Self::new()
    }
}

impl ServoReceiver {
    /// Create a receiver hunting for sync
    pub const fn new() -> Self {
        Self {
            phase: ServoPhase::Hunting,
            previous: 0,
            low: 0,
            staged: [0; CHANNEL_COUNT],
            checksum: Checksum::new(),
        }
    }

    /// Current phase
    pub fn phase(&self) -> ServoPhase {
        self.phase
    }

    /// Drop any partial frame and hunt for sync again
    pub fn reset(&mut self) {
        self.phase = ServoPhase::Hunting;
        self.previous = 0;
    }

    /// Process one received byte
    ///
    /// Returns `None` while a frame is incomplete, `Some(Ok(frame))` on a
    /// checksum-valid frame and `Some(Err(_))` when an in-flight frame is
    /// discarded.
    pub fn push(&mut self, byte: u8) -> Option<Result<ChannelFrame, SyncError>> {
        let previous = core::mem::replace(&mut self.previous, byte);

        if previous == SYNC[0] && byte == SYNC[1] {
            // Only a marker that cuts into the channel payload counts as a
            // sync loss; one landing on the checksum word is a plain restart
            let interrupted = matches!(self.phase, ServoPhase::Accumulate(n) if n > 1 && n < BODY_LEN - 1);
            self.phase = ServoPhase::Accumulate(0);
            self.checksum = Checksum::new();
            self.checksum.extend(&SYNC);
            return interrupted.then_some(Err(SyncError::UnexpectedByte(byte)));
        }

        let ServoPhase::Accumulate(n) = self.phase else {
            return None;
        };
        self.phase = ServoPhase::Accumulate(n + 1);

        if n % 2 == 0 {
            self.low = byte;
            return None;
        }

        let word = u16::from_le_bytes([self.low, byte]);
        let index = (n / 2) as usize;
        if index < CHANNEL_COUNT {
            self.staged[index] = word & CHANNEL_MASK;
            self.checksum.push(self.low);
            self.checksum.push(byte);
            return None;
        }

        self.phase = ServoPhase::Hunting;
        if self.checksum.matches(word) {
            Some(Ok(ChannelFrame(self.staged)))
        } else {
            Some(Err(SyncError::ChecksumMismatch {
                expected: self.checksum.value(),
                received: word,
            }))
        }
    }
}
