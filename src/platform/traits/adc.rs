//! ADC interface trait

use crate::platform::Result;
use rc_hydraulic_core::sensors::TemperatureCalibration;

/// 12-bit analog-to-digital converter
pub trait AdcInterface {
    /// Convert one channel and return the raw 12-bit sample
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Adc(AdcError::InvalidChannel)` if the channel
    /// is not wired on this board.
    fn read(&mut self, channel: u8) -> Result<u16>;

    /// Factory calibration of the internal temperature sensor
    fn temperature_calibration(&self) -> TemperatureCalibration;
}
