//! UART interface trait
//!
//! A single UART carries both servo frames (received on RX, full duplex) and
//! sensor telemetry (half duplex on the TX pin). The interface exposes the
//! register-level controls the line arbiter needs; byte reception is
//! delivered by the interrupt handler, not through this trait.

use crate::platform::Result;

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartConfig {
    /// Baud rate (bits per second)
    pub baud_rate: u32,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self { baud_rate: 115_200 }
    }
}

/// Half-duplex capable UART
///
/// # Safety Invariants
///
/// - Wiring mode changes only with both directions disabled
/// - The data register is written only with the transmitter enabled
pub trait UartInterface {
    /// Select single-wire half-duplex (`true`) or two-wire full duplex
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Uart(UartError::DirectionEnabled)` if the
    /// receiver or transmitter is still enabled.
    fn set_half_duplex(&mut self, enabled: bool) -> Result<()>;

    /// Enable or disable the receiver
    fn enable_receiver(&mut self, enabled: bool);

    /// Enable or disable the transmitter
    fn enable_transmitter(&mut self, enabled: bool);

    /// Load one byte into the transmit data register
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Uart(UartError::TransmitterDisabled)` if the
    /// transmitter is off.
    fn write_data(&mut self, byte: u8) -> Result<()>;

    /// Interrupt once the shift register drains instead of on data-register empty
    fn listen_transmit_complete(&mut self);

    /// Current baud rate
    fn baud_rate(&self) -> u32;
}
