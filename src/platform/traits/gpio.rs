//! GPIO interface trait

use crate::platform::Result;

/// Electrical level that means "active" for a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Active when driven high
    #[default]
    ActiveHigh,
    /// Active when driven low (sinking LED drivers)
    ActiveLow,
}

impl Polarity {
    /// Pin level for a logical state
    pub const fn level(self, active: bool) -> bool {
        match self {
            Polarity::ActiveHigh => active,
            Polarity::ActiveLow => !active,
        }
    }
}

/// Push-pull output pin
///
/// # Safety Invariants
///
/// - Only one owner per pin
/// - Pin number must be valid for the platform
pub trait GpioInterface {
    /// Drive the pin high
    fn set_high(&mut self) -> Result<()>;

    /// Drive the pin low
    fn set_low(&mut self) -> Result<()>;

    /// Level currently driven
    fn is_set_high(&self) -> bool;

    /// Drive the pin to the level that means `active` under `polarity`
    fn set_active(&mut self, polarity: Polarity, active: bool) -> Result<()> {
        if polarity.level(active) {
            self.set_high()
        } else {
            self.set_low()
        }
    }
}
