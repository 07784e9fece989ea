//! Mock watchdog implementation for testing

use crate::platform::{
    error::{PlatformError, WatchdogError},
    traits::WatchdogInterface,
    Result,
};

/// Longest window the mock accepts, matching a 7-bit window watchdog at 48 MHz
pub const MAX_WINDOW_US: u32 = 87_381;

/// Mock watchdog
#[derive(Debug, Default)]
pub struct MockWatchdog {
    timeout_us: Option<u32>,
    /// Number of refreshes since start
    pub feeds: u32,
}

impl MockWatchdog {
    /// Create a stopped mock watchdog
    pub fn new() -> Self {
        Self::default()
    }

    /// Configured window, if started
    pub fn timeout_us(&self) -> Option<u32> {
        self.timeout_us
    }
}

impl WatchdogInterface for MockWatchdog {
    fn start(&mut self, timeout_us: u32) -> Result<()> {
        if self.timeout_us.is_some() {
            return Err(PlatformError::Watchdog(WatchdogError::AlreadyStarted));
        }
        if timeout_us == 0 || timeout_us > MAX_WINDOW_US {
            return Err(PlatformError::Watchdog(WatchdogError::InvalidWindow));
        }
        self.timeout_us = Some(timeout_us);
        Ok(())
    }

    fn feed(&mut self) {
        if self.timeout_us.is_some() {
            self.feeds += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_once() {
        let mut wdt = MockWatchdog::new();
        wdt.feed();
        assert_eq!(wdt.feeds, 0);

        wdt.start(43_690).unwrap();
        assert_eq!(wdt.timeout_us(), Some(43_690));
        assert_eq!(
            wdt.start(43_690),
            Err(PlatformError::Watchdog(WatchdogError::AlreadyStarted))
        );

        wdt.feed();
        assert_eq!(wdt.feeds, 1);
    }

    #[test]
    fn test_window_limits() {
        let mut wdt = MockWatchdog::new();
        assert!(wdt.start(0).is_err());
        assert!(wdt.start(MAX_WINDOW_US + 1).is_err());
        assert_eq!(wdt.timeout_us(), None);
    }
}
