//! Watchdog interface trait

use crate::platform::Result;

/// Hardware watchdog
///
/// Once started it cannot be stopped; a missed refresh resets the MCU and
/// brings every output back to its power-on state.
pub trait WatchdogInterface {
    /// Arm the watchdog with a window of roughly `timeout_us`
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Watchdog` if the window cannot be expressed or
    /// the watchdog is already running.
    fn start(&mut self, timeout_us: u32) -> Result<()>;

    /// Reload the counter
    fn feed(&mut self);
}
