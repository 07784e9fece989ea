//! iBUS serial line over a platform UART and one-shot timer
//!
//! [`PlatformLine`] implements the controller's [`SerialLine`]. The wiring
//! mode switch runs inside a critical section: on the target the UART
//! interrupt must not observe the control register half rewritten.

use rc_hydraulic_core::traits::{LineMode, SerialLine};

use crate::platform::traits::{TimerInterface, UartInterface};
use crate::platform::{PlatformError, Result};

/// [`SerialLine`] over a UART and the turnaround timer
pub struct PlatformLine<U, T> {
    uart: U,
    turnaround: T,
    last_fault: Option<PlatformError>,
    faults: u32,
}

impl<U, T> PlatformLine<U, T>
where
    U: UartInterface,
    T: TimerInterface,
{
    /// Wrap a claimed UART and the timer dedicated to the telemetry window
    pub fn new(uart: U, turnaround: T) -> Self {
        Self {
            uart,
            turnaround,
            last_fault: None,
            faults: 0,
        }
    }

    /// Underlying UART
    pub fn uart(&self) -> &U {
        &self.uart
    }

    /// Underlying UART, mutable
    pub fn uart_mut(&mut self) -> &mut U {
        &mut self.uart
    }

    /// Turnaround timer
    pub fn turnaround(&self) -> &T {
        &self.turnaround
    }

    /// Turnaround timer, mutable
    pub fn turnaround_mut(&mut self) -> &mut T {
        &mut self.turnaround
    }

    /// Platform faults seen since power on
    pub fn faults(&self) -> u32 {
        self.faults
    }

    fn report(&mut self, result: Result<()>) {
        if let Err(error) = result {
            self.faults = self.faults.wrapping_add(1);
            if self.last_fault != Some(error) {
                crate::log_warn!("serial line fault #{}: {}", self.faults, error);
                self.last_fault = Some(error);
            }
        }
    }
}

impl<U, T> SerialLine for PlatformLine<U, T>
where
    U: UartInterface,
    T: TimerInterface,
{
    fn set_mode(&mut self, mode: LineMode) {
        let half_duplex = mode == LineMode::HalfDuplex;
        let uart = &mut self.uart;
        let result = critical_section::with(|_| uart.set_half_duplex(half_duplex));
        self.report(result);
    }

    fn set_receiver(&mut self, enabled: bool) {
        self.uart.enable_receiver(enabled);
    }

    fn set_transmitter(&mut self, enabled: bool) {
        self.uart.enable_transmitter(enabled);
    }

    fn write_byte(&mut self, byte: u8) {
        let result = self.uart.write_data(byte);
        self.report(result);
    }

    fn await_completion(&mut self) {
        self.uart.listen_transmit_complete();
    }

    fn arm_turnaround(&mut self, window_us: u32) {
        let result = self.turnaround.start_oneshot(window_us);
        self.report(result);
    }
}
