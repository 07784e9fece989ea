//! Mock ADC implementation for testing

use crate::platform::{
    error::{AdcError, PlatformError},
    traits::AdcInterface,
    Result,
};
use rc_hydraulic_core::sensors::TemperatureCalibration;

/// Channels a board can wire (16 external + temperature, reference, battery)
pub const ADC_CHANNELS: usize = 19;

/// Mock ADC with a configurable sample per channel
#[derive(Debug)]
pub struct MockAdc {
    samples: [Option<u16>; ADC_CHANNELS],
    calibration: TemperatureCalibration,
    /// Conversions performed
    pub conversions: u32,
}

impl MockAdc {
    /// Create a mock ADC with no channels wired
    pub fn new(calibration: TemperatureCalibration) -> Self {
        Self {
            samples: [None; ADC_CHANNELS],
            calibration,
            conversions: 0,
        }
    }

    /// Wire `channel` and set the value its conversions return
    pub fn set_sample(&mut self, channel: u8, raw: u16) {
        if let Some(slot) = self.samples.get_mut(channel as usize) {
            *slot = Some(raw & 0x0FFF);
        }
    }
}

impl AdcInterface for MockAdc {
    fn read(&mut self, channel: u8) -> Result<u16> {
        let raw = self
            .samples
            .get(channel as usize)
            .copied()
            .flatten()
            .ok_or(PlatformError::Adc(AdcError::InvalidChannel(channel)))?;
        self.conversions += 1;
        Ok(raw)
    }

    fn temperature_calibration(&self) -> TemperatureCalibration {
        self.calibration
    }
}
