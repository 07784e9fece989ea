//! Watchdog adapter

use rc_hydraulic_core::traits::Watchdog;

use crate::platform::traits::WatchdogInterface;
use crate::platform::Result;

/// Controller [`Watchdog`] over the hardware watchdog
pub struct HardwareWatchdog<W> {
    inner: W,
}

impl<W: WatchdogInterface> HardwareWatchdog<W> {
    /// Arm `inner` with `window_us` and wrap it
    ///
    /// # Errors
    ///
    /// Propagates the platform error if the window cannot be configured.
    pub fn start(mut inner: W, window_us: u32) -> Result<Self> {
        inner.start(window_us)?;
        crate::log_info!("watchdog armed, window {} us", window_us);
        Ok(Self { inner })
    }

    /// Underlying peripheral
    pub fn inner(&self) -> &W {
        &self.inner
    }
}

impl<W: WatchdogInterface> Watchdog for HardwareWatchdog<W> {
    fn refresh(&mut self) {
        self.inner.feed();
    }
}
