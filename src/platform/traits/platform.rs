//! Root platform trait

use super::{
    AdcInterface, GpioInterface, PwmConfig, PwmInterface, TimerInterface, UartConfig,
    UartInterface, WatchdogInterface,
};
use crate::platform::Result;

/// Root platform trait
///
/// Aggregates the peripheral types of one board. Implementations hand out
/// each peripheral at most once; a second claim returns
/// `PlatformError::ResourceUnavailable`.
pub trait Platform: Sized {
    /// UART peripheral type
    type Uart: UartInterface;

    /// PWM output type
    type Pwm: PwmInterface;

    /// Output pin type
    type Gpio: GpioInterface;

    /// Timer type
    type Timer: TimerInterface;

    /// ADC type
    type Adc: AdcInterface;

    /// Watchdog type
    type Watchdog: WatchdogInterface;

    /// Initialize clocks and bring every output pin to its reset level
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::InitializationFailed` if initialization fails.
    fn init() -> Result<Self>;

    /// System clock frequency in Hz
    fn system_clock_hz(&self) -> u32;

    /// Claim a UART
    fn create_uart(&mut self, uart_id: u8, config: UartConfig) -> Result<Self::Uart>;

    /// Claim a PWM output on `pin`
    fn create_pwm(&mut self, pin: u8, config: PwmConfig) -> Result<Self::Pwm>;

    /// Claim `pin` as a push-pull output, initially low
    fn create_gpio(&mut self, pin: u8) -> Result<Self::Gpio>;

    /// Claim a hardware timer
    fn create_timer(&mut self, timer_id: u8) -> Result<Self::Timer>;

    /// Claim the ADC
    fn create_adc(&mut self) -> Result<Self::Adc>;

    /// Claim the watchdog
    fn create_watchdog(&mut self) -> Result<Self::Watchdog>;
}
