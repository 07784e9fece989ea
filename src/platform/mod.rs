//! Platform abstraction layer
//!
//! Peripheral traits the firmware is written against, plus mock
//! implementations for host testing. Board support lives outside this crate
//! and implements [`traits::Platform`].

pub mod error;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{PlatformError, Result};
pub use traits::{
    AdcInterface, GpioInterface, Platform, PwmInterface, TimerInterface, UartInterface,
    WatchdogInterface,
};
