//! Mock GPIO implementation for testing

use crate::platform::{traits::GpioInterface, Result};

/// Mock output pin
///
/// Tracks the driven level and counts level changes.
#[derive(Debug, Default)]
pub struct MockGpio {
    pin: u8,
    high: bool,
    /// Number of writes that changed the level
    pub transitions: u32,
}

impl MockGpio {
    /// Create a new mock pin, driven low
    pub fn new(pin: u8) -> Self {
        Self {
            pin,
            high: false,
            transitions: 0,
        }
    }

    /// Pin number
    pub fn pin(&self) -> u8 {
        self.pin
    }

    fn drive(&mut self, high: bool) {
        if self.high != high {
            self.transitions += 1;
        }
        self.high = high;
    }
}

impl GpioInterface for MockGpio {
    fn set_high(&mut self) -> Result<()> {
        self.drive(true);
        Ok(())
    }

    fn set_low(&mut self) -> Result<()> {
        self.drive(false);
        Ok(())
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}
