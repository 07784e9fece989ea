//! Sensor telemetry requests and replies
//!
//! While the line is in half-duplex mode the receiver polls sensors with
//! 4-byte requests:
//!
//! ```text
//! [len = 4] [cmd] [ck_lo] [ck_hi]      ck = 0xFFFF - len - cmd
//! ```
//!
//! The high nibble of `cmd` selects the command and the low nibble carries
//! the sensor address (table index + 1). Address 0 is reserved by the
//! receiver for its own internal sensor.
//!
//! Replies reuse the same checksum discipline:
//!
//! | Command | Reply                                        |
//! |---------|----------------------------------------------|
//! | `0x8n`  | echo of the 4 request bytes                  |
//! | `0x9n`  | `[6] [cmd] [type] [width] [ck_lo] [ck_hi]`   |
//! | `0xAn`  | `[6 or 8] [cmd] [value LE] [ck_lo] [ck_hi]`  |

use heapless::Vec;

use super::{Checksum, SyncError};
use crate::sensors::SensorDescriptor;
use crate::traits::SensorSource;

/// Length byte of every request
pub const REQUEST_LEN: u8 = 4;

/// Largest reply frame (4-byte value)
pub const MAX_REPLY_LEN: usize = 8;

/// Reply frame bytes
pub type Reply = Vec<u8, MAX_REPLY_LEN>;

/// Request command kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Discovery: is there a sensor at this address?
    Probe,
    /// Sensor type and value width
    TypeQuery,
    /// Current sensor value
    ValueQuery,
}

impl Command {
    /// Decode a command nibble (upper four bits of the command byte)
    pub fn from_nibble(nibble: u8) -> Option<Self> {
        match nibble {
            0x8 => Some(Command::Probe),
            0x9 => Some(Command::TypeQuery),
            0xA => Some(Command::ValueQuery),
            _ => None,
        }
    }
}

/// Reason a checksum-valid request produced no reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorDrop {
    /// Address 0 is reserved for the receiver itself
    ReservedIndex,
    /// No sensor at this table index
    UnknownSensor(usize),
    /// Value width other than 2 or 4 bytes
    UnsupportedWidth(u8),
    /// Command nibble outside 0x8..=0xA
    UnknownCommand(u8),
}

/// One checksum-valid sensor request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    command: u8,
    checksum: u16,
}

impl Request {
    /// Build a request for `command` and sensor table `index`
    pub fn new(command: Command, index: usize) -> Self {
        let nibble = match command {
            Command::Probe => 0x80,
            Command::TypeQuery => 0x90,
            Command::ValueQuery => 0xA0,
        };
        let command = nibble | ((index as u8).wrapping_add(1) & 0x0F);
        Self {
            command,
            checksum: Checksum::of(&[REQUEST_LEN, command]),
        }
    }

    /// Raw command byte
    pub fn command_byte(&self) -> u8 {
        self.command
    }

    /// Sensor table index addressed by the request
    pub fn sensor_index(&self) -> Result<usize, SensorDrop> {
        match self.command & 0x0F {
            0 => Err(SensorDrop::ReservedIndex),
            address => Ok((address - 1) as usize),
        }
    }

    /// Requested command
    pub fn command(&self) -> Result<Command, SensorDrop> {
        let nibble = self.command >> 4;
        Command::from_nibble(nibble).ok_or(SensorDrop::UnknownCommand(nibble))
    }

    /// The four request bytes as they appeared on the wire
    pub fn to_bytes(&self) -> [u8; 4] {
        let [low, high] = self.checksum.to_le_bytes();
        [REQUEST_LEN, self.command, low, high]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestPhase {
    Length,
    Command,
    ChecksumLow,
    ChecksumHigh,
    Halted,
}

/// Byte-at-a-time telemetry request parser
///
/// After a malformed request the parser halts and ignores everything until
/// [`RequestParser::reset`], which the controller calls at the start of each
/// telemetry window.
#[derive(Debug, Clone)]
pub struct RequestParser {
    phase: RequestPhase,
    length: u8,
    command: u8,
    checksum_low: u8,
    checksum: Checksum,
}

impl Default for RequestParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestParser {
    /// Create a parser waiting for a length byte
    pub const fn new() -> Self {
        Self {
            phase: RequestPhase::Length,
            length: 0,
            command: 0,
            checksum_low: 0,
            checksum: Checksum::new(),
        }
    }

    /// Resynchronize at a request boundary
    pub fn reset(&mut self) {
        self.phase = RequestPhase::Length;
        self.checksum = Checksum::new();
    }

    /// Whether the parser gave up on the current window
    pub fn is_halted(&self) -> bool {
        self.phase == RequestPhase::Halted
    }

    /// Process one received byte
    pub fn push(&mut self, byte: u8) -> Option<Result<Request, SyncError>> {
        match self.phase {
            RequestPhase::Length => {
                self.length = byte;
                self.checksum.push(byte);
                self.phase = RequestPhase::Command;
                None
            }
            RequestPhase::Command => {
                self.command = byte;
                self.checksum.push(byte);
                self.phase = RequestPhase::ChecksumLow;
                None
            }
            RequestPhase::ChecksumLow => {
                self.checksum_low = byte;
                self.phase = RequestPhase::ChecksumHigh;
                None
            }
            RequestPhase::ChecksumHigh => {
                let received = u16::from_le_bytes([self.checksum_low, byte]);
                if self.length != REQUEST_LEN {
                    self.phase = RequestPhase::Halted;
                    return Some(Err(SyncError::BadLength(self.length)));
                }
                if !self.checksum.matches(received) {
                    self.phase = RequestPhase::Halted;
                    return Some(Err(SyncError::ChecksumMismatch {
                        expected: self.checksum.value(),
                        received,
                    }));
                }
                self.reset();
                Some(Ok(Request {
                    command: self.command,
                    checksum: received,
                }))
            }
            RequestPhase::Halted => None,
        }
    }
}

/// Build the reply to `request`
///
/// Lookup order follows the receiver's expectations: the address is checked
/// first, then the sensor table, then the command. An unknown sensor is
/// dropped even for a probe so the receiver stops polling that address.
pub fn reply<Q: SensorSource>(
    request: &Request,
    table: &[SensorDescriptor],
    source: &Q,
) -> Result<Reply, SensorDrop> {
    let index = request.sensor_index()?;
    let descriptor = table.get(index).ok_or(SensorDrop::UnknownSensor(index))?;

    let mut frame = Reply::new();
    match request.command()? {
        Command::Probe => {
            // Request is exactly 4 bytes; capacity cannot be exceeded
            let _ = frame.extend_from_slice(&request.to_bytes());
            return Ok(frame);
        }
        Command::TypeQuery => {
            push_payload(&mut frame, request.command, &descriptor.type_word().to_le_bytes());
        }
        Command::ValueQuery => {
            let value = source.value(index);
            match descriptor.width {
                2 => push_payload(&mut frame, request.command, &(value as u16).to_le_bytes()),
                4 => push_payload(&mut frame, request.command, &value.to_le_bytes()),
                width => return Err(SensorDrop::UnsupportedWidth(width)),
            }
        }
    }
    Ok(frame)
}

fn push_payload(frame: &mut Reply, command: u8, payload: &[u8]) {
    // Payloads are 2 or 4 bytes, so the frame never exceeds 8 bytes
    let length = (payload.len() + 4) as u8;
    let _ = frame.push(length);
    let _ = frame.push(command);
    let _ = frame.extend_from_slice(payload);
    let checksum = Checksum::of(frame);
    let _ = frame.extend_from_slice(&checksum.to_le_bytes());
}
