//! Adapters binding the controller to platform peripherals
//!
//! ## Libraries
//!
//! - `actuator_outputs`: PWM channels, digital lines, beeper tone and strobe timer
//! - `serial_line`: half-duplex iBUS line over a UART and turnaround timer
//! - `watchdog`: watchdog refresh

pub mod actuator_outputs;
pub mod serial_line;
pub mod watchdog;

// Re-export commonly used types
pub use actuator_outputs::PlatformActuators;
pub use serial_line::PlatformLine;
pub use watchdog::HardwareWatchdog;
