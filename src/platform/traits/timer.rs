//! Hardware timer interface trait
//!
//! Each timer raises its own interrupt when it expires; the interrupt
//! handler turns that into an event. Durations are in microseconds.

use crate::platform::Result;

/// Timer interface trait
pub trait TimerInterface {
    /// Fire once after `us` microseconds, replacing any running schedule
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Timer(TimerError::InvalidDuration)` if `us`
    /// is zero.
    fn start_oneshot(&mut self, us: u32) -> Result<()>;

    /// Fire every `us` microseconds, replacing any running schedule
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Timer(TimerError::InvalidDuration)` if `us`
    /// is zero.
    fn start_periodic(&mut self, us: u32) -> Result<()>;

    /// Stop the timer
    fn stop(&mut self);

    /// Check if a schedule is active
    fn is_running(&self) -> bool;

    /// Monotonic time in microseconds
    fn now_us(&self) -> u64;

    /// Monotonic time in milliseconds
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }
}
