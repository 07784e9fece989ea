//! PWM interface trait
//!
//! Outputs are counter/compare based: the counter runs at `tick_hz` and
//! wraps every `period` ticks, and the output is high while the counter is
//! below the compare value.

use crate::platform::Result;

/// PWM configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwmConfig {
    /// Counter clock in Hz
    pub tick_hz: u32,
    /// Counter period in ticks
    pub period: u16,
}

impl PwmConfig {
    /// Servo output: 1 µs ticks, so the compare value is the pulse width
    pub const fn servo(period_us: u16) -> Self {
        Self {
            tick_hz: 1_000_000,
            period: period_us,
        }
    }

    /// H-bridge output: compare value is the drive magnitude (0 to `period`)
    pub const fn bridge(tick_hz: u32, period: u16) -> Self {
        Self { tick_hz, period }
    }

    /// Square wave at `frequency` Hz, half duty at `period / 2`
    pub const fn tone(timer_hz: u32, frequency: u32) -> Self {
        let period = timer_hz / frequency;
        Self {
            tick_hz: timer_hz,
            period: if period > u16::MAX as u32 {
                u16::MAX
            } else {
                period as u16
            },
        }
    }

    /// Output frequency in Hz
    pub const fn frequency(&self) -> u32 {
        if self.period == 0 {
            0
        } else {
            self.tick_hz / self.period as u32
        }
    }
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self::servo(4_000)
    }
}

/// PWM interface trait
///
/// # Safety Invariants
///
/// - One owner per output channel
/// - Compare updates take effect at the next period boundary
pub trait PwmInterface {
    /// Set the compare value in ticks
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Pwm(PwmError::CompareOutOfRange)` if `ticks`
    /// exceeds the period.
    fn set_compare(&mut self, ticks: u16) -> Result<()>;

    /// Current compare value in ticks
    fn compare(&self) -> u16;

    /// Counter period in ticks
    fn period(&self) -> u16;

    /// Enable output
    fn enable(&mut self);

    /// Disable output (pin forced low)
    fn disable(&mut self);

    /// Check if output is enabled
    fn is_enabled(&self) -> bool;
}
