//! Mock PWM implementation for testing

use crate::platform::{
    error::{PlatformError, PwmError},
    traits::{PwmConfig, PwmInterface},
    Result,
};

/// Mock PWM implementation
///
/// Tracks compare value, period and enable state for test verification.
#[derive(Debug)]
pub struct MockPwm {
    config: PwmConfig,
    compare: u16,
    enabled: bool,
}

impl MockPwm {
    /// Create a new mock PWM output, compare at zero and disabled
    pub fn new(config: PwmConfig) -> Self {
        Self {
            config,
            compare: 0,
            enabled: false,
        }
    }

    /// Configuration the output was created with
    pub fn config(&self) -> PwmConfig {
        self.config
    }
}

impl PwmInterface for MockPwm {
    fn set_compare(&mut self, ticks: u16) -> Result<()> {
        if ticks > self.config.period {
            return Err(PlatformError::Pwm(PwmError::CompareOutOfRange));
        }
        self.compare = ticks;
        Ok(())
    }

    fn compare(&self) -> u16 {
        self.compare
    }

    fn period(&self) -> u16 {
        self.config.period
    }

    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_pwm_compare() {
        let mut pwm = MockPwm::new(PwmConfig::servo(4_000));
        assert_eq!(pwm.compare(), 0);

        pwm.set_compare(1_500).unwrap();
        assert_eq!(pwm.compare(), 1_500);

        pwm.set_compare(4_000).unwrap();
        assert_eq!(
            pwm.set_compare(4_001),
            Err(PlatformError::Pwm(PwmError::CompareOutOfRange))
        );
        assert_eq!(pwm.compare(), 4_000);
    }

    #[test]
    fn test_mock_pwm_enable() {
        let mut pwm = MockPwm::new(PwmConfig::bridge(48_000_000, 500));
        assert!(!pwm.is_enabled());

        pwm.enable();
        assert!(pwm.is_enabled());

        pwm.disable();
        assert!(!pwm.is_enabled());
    }

    #[test]
    fn test_tone_config() {
        let tone = PwmConfig::tone(48_000_000, 1_318);
        assert_eq!(tone.period, 36_418);
        assert_eq!(tone.frequency(), 1_318);
    }
}
