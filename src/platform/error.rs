//! Platform error types
//!
//! Every peripheral implementation maps its HAL errors onto these variants.
//! None of them is recoverable at runtime: adapters log and carry on, and
//! the watchdog takes over if the control loop stops making progress.

use core::fmt;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Platform-level errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlatformError {
    /// UART operation failed
    Uart(UartError),
    /// PWM operation failed
    Pwm(PwmError),
    /// GPIO operation failed
    Gpio(GpioError),
    /// Timer operation failed
    Timer(TimerError),
    /// ADC conversion failed
    Adc(AdcError),
    /// Watchdog could not be configured
    Watchdog(WatchdogError),
    /// Platform initialization failed
    InitializationFailed,
    /// Peripheral or pin already claimed, or out of range
    ResourceUnavailable,
}

/// UART-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartError {
    /// Data register written while the transmitter is disabled
    TransmitterDisabled,
    /// Wiring mode changed while a direction was still enabled
    DirectionEnabled,
    /// Baud rate not reachable from the peripheral clock
    InvalidBaudRate,
    /// Framing error on a received byte
    FramingError,
    /// Received byte overwritten before it was read
    Overrun,
}

/// PWM-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmError {
    /// Compare value beyond the counter period
    CompareOutOfRange,
    /// Frequency not reachable from the timer clock
    InvalidFrequency,
}

/// GPIO-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioError {
    /// Invalid pin number
    InvalidPin,
    /// Pin already in use
    PinInUse,
}

/// Timer-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerError {
    /// Zero or over-long duration
    InvalidDuration,
}

/// ADC-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcError {
    /// Channel not wired on this board
    InvalidChannel(u8),
    /// Conversion did not finish
    Timeout,
}

/// Watchdog-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WatchdogError {
    /// Requested window outside what the prescaler can express
    InvalidWindow,
    /// Watchdog already running; it cannot be reconfigured until reset
    AlreadyStarted,
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::Uart(e) => write!(f, "UART error: {:?}", e),
            PlatformError::Pwm(e) => write!(f, "PWM error: {:?}", e),
            PlatformError::Gpio(e) => write!(f, "GPIO error: {:?}", e),
            PlatformError::Timer(e) => write!(f, "Timer error: {:?}", e),
            PlatformError::Adc(e) => write!(f, "ADC error: {:?}", e),
            PlatformError::Watchdog(e) => write!(f, "Watchdog error: {:?}", e),
            PlatformError::InitializationFailed => write!(f, "Platform initialization failed"),
            PlatformError::ResourceUnavailable => write!(f, "Resource not available"),
        }
    }
}
