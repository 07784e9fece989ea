//! Mock platform implementation for testing
//!
//! In-memory peripherals that record what the firmware did to them. All
//! storage is fixed-capacity (`heapless`), so the mocks also build for the
//! target when the `mock` feature is enabled.
//!
//! # Example
//!
//! ```
//! use rc_hydraulic::platform::mock::MockPlatform;
//! use rc_hydraulic::platform::traits::{Platform, UartInterface};
//!
//! let mut platform = MockPlatform::new();
//! let mut uart = platform.create_uart(0, Default::default()).unwrap();
//! uart.enable_transmitter(true);
//! uart.write_data(0x04).unwrap();
//! assert_eq!(uart.tx_buffer(), &[0x04]);
//! ```

#![cfg(any(test, feature = "mock"))]

mod adc;
mod gpio;
mod platform;
mod pwm;
mod timer;
mod uart;
mod watchdog;

pub use adc::MockAdc;
pub use gpio::MockGpio;
pub use platform::MockPlatform;
pub use pwm::MockPwm;
pub use timer::MockTimer;
pub use uart::MockUart;
pub use watchdog::MockWatchdog;
