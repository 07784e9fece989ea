//! Platform abstraction traits
//!
//! The peripherals the firmware drives: servo/H-bridge PWM outputs, digital
//! lines, the single half-duplex UART, timers, the ADC and the watchdog.

pub mod adc;
pub mod gpio;
pub mod platform;
pub mod pwm;
pub mod timer;
pub mod uart;
pub mod watchdog;

pub use adc::AdcInterface;
pub use gpio::{GpioInterface, Polarity};
pub use platform::Platform;
pub use pwm::{PwmConfig, PwmInterface};
pub use timer::TimerInterface;
pub use uart::{UartConfig, UartInterface};
pub use watchdog::WatchdogInterface;
