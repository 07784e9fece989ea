//! iBUS serial protocol
//!
//! One UART carries two kinds of traffic:
//!
//! - Servo frames from the receiver (full duplex, RX pin), handled by
//!   [`ServoReceiver`]
//! - Sensor requests and replies (half duplex, TX pin), handled by
//!   [`RequestParser`] and [`reply`]
//!
//! Both parsers are fed one byte at a time from interrupt context and never
//! allocate or block. Framing failures are reported as [`SyncError`] values
//! that callers count and otherwise ignore; the sender simply retransmits.

pub mod checksum;
pub mod sensor;
pub mod servo;
pub mod transmit;

pub use checksum::Checksum;
pub use sensor::{reply, Command, Reply, Request, RequestParser, SensorDrop};
pub use servo::{ChannelFrame, ServoReceiver, CHANNEL_COUNT, FRAME_LEN, SYNC};
pub use transmit::{TransmitBuffer, TransmitError};

/// Reason an in-flight frame was discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncError {
    /// Trailing checksum word did not match the accumulated bytes
    ChecksumMismatch {
        /// Locally accumulated checksum
        expected: u16,
        /// Checksum word found on the wire
        received: u16,
    },
    /// Telemetry request length byte was not 4
    BadLength(u8),
    /// A sync marker interrupted a partially received servo frame
    UnexpectedByte(u8),
}
