//! Subtractive iBUS checksum
//!
//! Every iBUS frame ends with a little-endian word equal to `0xFFFF` minus
//! the sum of all preceding bytes. The accumulator costs one subtraction per
//! byte and needs no buffering.

/// Running subtractive checksum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checksum(u16);

impl Default for Checksum {
    fn default() -> Self {
        Self::new()
    }
}

impl Checksum {
    /// Initial accumulator value
    pub const SEED: u16 = 0xFFFF;

    /// Start a new accumulation
    pub const fn new() -> Self {
        Self(Self::SEED)
    }

    /// Subtract one byte
    pub fn push(&mut self, byte: u8) {
        self.0 = self.0.wrapping_sub(byte as u16);
    }

    /// Subtract a run of bytes
    pub fn extend(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.push(byte);
        }
    }

    /// Current checksum word
    pub fn value(&self) -> u16 {
        self.0
    }

    /// Whether a received checksum word matches the accumulated value
    pub fn matches(&self, received: u16) -> bool {
        self.0 == received
    }

    /// Checksum of a complete byte run
    pub fn of(bytes: &[u8]) -> u16 {
        let mut checksum = Self::new();
        checksum.extend(bytes);
        checksum.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_seed() {
        assert_eq!(Checksum::of(&[]), 0xFFFF);
    }

    #[test]
    fn test_sync_marker_seed() {
        // Servo frames are seeded after the 0x20 0x40 marker
        assert_eq!(Checksum::of(&[0x20, 0x40]), 0xFF9F);
    }

    #[test]
    fn test_type_reply_seed() {
        // A 6-byte reply starts at 0xFFFF - 6
        assert_eq!(Checksum::of(&[6]), 0xFFF9);
        assert_eq!(Checksum::of(&[8]), 0xFFF7);
    }

    #[test]
    fn test_wraps_on_long_runs() {
        let bytes = [0xFF; 300];
        let expected = 0xFFFFu16.wrapping_sub((300u32 * 0xFF) as u16);
        assert_eq!(Checksum::of(&bytes), expected);
    }

    #[test]
    fn test_matches() {
        let mut checksum = Checksum::new();
        checksum.push(4);
        checksum.push(0x81);
        assert!(checksum.matches(0xFFFF - 4 - 0x81));
        assert!(!checksum.matches(0xFFFF - 4 - 0x82));
    }
}
