//! Mock Platform implementation for testing

use crate::platform::{
    error::PlatformError,
    traits::{Platform, PwmConfig, UartConfig},
    Result,
};
use rc_hydraulic_core::sensors::TemperatureCalibration;

use super::{MockAdc, MockGpio, MockPwm, MockTimer, MockUart, MockWatchdog};

/// Factory calibration reported by the mock ADC
pub const MOCK_CALIBRATION: TemperatureCalibration = TemperatureCalibration {
    cal30: 1_720,
    cal110: 1_300,
};

/// Mock Platform implementation
///
/// Hands out mock peripherals and enforces single ownership of pins,
/// timers and singleton peripherals.
///
/// # Example
///
/// ```
/// use rc_hydraulic::platform::mock::MockPlatform;
/// use rc_hydraulic::platform::traits::{GpioInterface, Platform};
///
/// let mut platform = MockPlatform::new();
/// let mut lamp = platform.create_gpio(13).unwrap();
/// lamp.set_high().unwrap();
/// assert!(platform.create_gpio(13).is_err());
/// ```
#[derive(Debug, Default)]
pub struct MockPlatform {
    pins_claimed: u64,
    timers_claimed: u8,
    uart_claimed: bool,
    adc_claimed: bool,
    watchdog_claimed: bool,
}

impl MockPlatform {
    /// Create a new mock platform
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of UART peripherals
    pub const MAX_UARTS: u8 = 1;

    /// Number of general purpose timers
    pub const MAX_TIMERS: u8 = 4;

    /// Maximum GPIO pin number (ports A, B and F, 16 pins each)
    pub const MAX_GPIO: u8 = 47;

    fn claim_pin(&mut self, pin: u8) -> Result<()> {
        if pin > Self::MAX_GPIO || self.pins_claimed & (1u64 << pin) != 0 {
            return Err(PlatformError::ResourceUnavailable);
        }
        self.pins_claimed |= 1u64 << pin;
        Ok(())
    }

    fn claim(flag: &mut bool) -> Result<()> {
        if *flag {
            return Err(PlatformError::ResourceUnavailable);
        }
        *flag = true;
        Ok(())
    }
}

impl Platform for MockPlatform {
    type Uart = MockUart;
    type Pwm = MockPwm;
    type Gpio = MockGpio;
    type Timer = MockTimer;
    type Adc = MockAdc;
    type Watchdog = MockWatchdog;

    fn init() -> Result<Self> {
        Ok(Self::new())
    }

    fn system_clock_hz(&self) -> u32 {
        48_000_000
    }

    fn create_uart(&mut self, uart_id: u8, config: UartConfig) -> Result<Self::Uart> {
        if uart_id >= Self::MAX_UARTS {
            return Err(PlatformError::ResourceUnavailable);
        }
        Self::claim(&mut self.uart_claimed)?;
        Ok(MockUart::new(config))
    }

    fn create_pwm(&mut self, pin: u8, config: PwmConfig) -> Result<Self::Pwm> {
        self.claim_pin(pin)?;
        Ok(MockPwm::new(config))
    }

    fn create_gpio(&mut self, pin: u8) -> Result<Self::Gpio> {
        self.claim_pin(pin)?;
        Ok(MockGpio::new(pin))
    }

    fn create_timer(&mut self, timer_id: u8) -> Result<Self::Timer> {
        if timer_id >= Self::MAX_TIMERS || self.timers_claimed & (1 << timer_id) != 0 {
            return Err(PlatformError::ResourceUnavailable);
        }
        self.timers_claimed |= 1 << timer_id;
        Ok(MockTimer::new())
    }

    fn create_adc(&mut self) -> Result<Self::Adc> {
        Self::claim(&mut self.adc_claimed)?;
        Ok(MockAdc::new(MOCK_CALIBRATION))
    }

    fn create_watchdog(&mut self) -> Result<Self::Watchdog> {
        Self::claim(&mut self.watchdog_claimed)?;
        Ok(MockWatchdog::new())
    }
}
