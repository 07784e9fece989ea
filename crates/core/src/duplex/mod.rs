//! Half-duplex line arbitration
//!
//! One UART serves both directions. The arbiter owns the line phase and is
//! the only code that touches the receiver/transmitter enables:
//!
//! ```text
//!  power on ──► ServoListening ──(valid servo frame)──► TelemetryListening
//!                    ▲                                     │        ▲
//!                    │                         (request)   ▼        │ (TC)
//!                    │                              Transmitting ─► Draining
//!                    └──────────────(turnaround timeout, any phase)─┘
//! ```
//!
//! Every transition disables before it enables, so the receiver and the
//! transmitter are never on together, and the wiring mode is only switched
//! with both off.

use crate::traits::{LineMode, SerialLine};

/// Time the line stays in half-duplex mode after a servo frame
///
/// The receiver sends servo frames every 7 ms; 3.6 ms leaves room for a
/// request and its reply before the next frame starts.
pub const TURNAROUND_WINDOW_US: u32 = 3_600;

/// Arbiter state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinePhase {
    /// Full duplex, receiving servo frames on RX
    ServoListening,
    /// Half duplex, receiving sensor requests on TX
    TelemetryListening,
    /// Half duplex, feeding reply bytes
    Transmitting,
    /// Half duplex, last byte loaded, waiting for it to leave the wire
    Draining,
}

/// Half-duplex line arbiter
#[derive(Debug, Clone)]
pub struct HalfDuplexArbiter {
    phase: LinePhase,
    window_us: u32,
}

impl Default for HalfDuplexArbiter {
    fn default() -> Self {
        Self::new(TURNAROUND_WINDOW_US)
    }
}

impl HalfDuplexArbiter {
    /// Create an arbiter with the given telemetry window
    pub const fn new(window_us: u32) -> Self {
        Self {
            phase: LinePhase::ServoListening,
            window_us,
        }
    }

    /// Current phase
    pub fn phase(&self) -> LinePhase {
        self.phase
    }

    /// Wiring mode implied by the phase
    pub fn mode(&self) -> LineMode {
        match self.phase {
            LinePhase::ServoListening => LineMode::FullDuplex,
            _ => LineMode::HalfDuplex,
        }
    }

    /// Bring the line up in full duplex with only the receiver enabled
    pub fn power_on<L: SerialLine>(&mut self, line: &mut L) {
        line.set_transmitter(false);
        line.set_receiver(false);
        line.set_mode(LineMode::FullDuplex);
        line.set_receiver(true);
        self.phase = LinePhase::ServoListening;
    }

    /// Switch to telemetry listening after a valid servo frame
    ///
    /// Returns `false` if the line was not servo listening.
    pub fn open_telemetry_window<L: SerialLine>(&mut self, line: &mut L) -> bool {
        if self.phase != LinePhase::ServoListening {
            return false;
        }
        line.set_receiver(false);
        line.set_mode(LineMode::HalfDuplex);
        line.set_receiver(true);
        line.arm_turnaround(self.window_us);
        self.phase = LinePhase::TelemetryListening;
        true
    }

    /// Turn the line around for a reply
    ///
    /// The receiver goes off first: in half-duplex mode it would otherwise
    /// hear our own bytes.
    pub fn begin_transmit<L: SerialLine>(&mut self, line: &mut L) -> bool {
        if self.phase != LinePhase::TelemetryListening {
            return false;
        }
        line.set_receiver(false);
        line.set_transmitter(true);
        self.phase = LinePhase::Transmitting;
        true
    }

    /// The final reply byte was loaded into the data register
    pub fn last_byte_written<L: SerialLine>(&mut self, line: &mut L) -> bool {
        if self.phase != LinePhase::Transmitting {
            return false;
        }
        line.await_completion();
        self.phase = LinePhase::Draining;
        true
    }

    /// The final reply byte left the wire; listen for the next request
    pub fn transmit_complete<L: SerialLine>(&mut self, line: &mut L) -> bool {
        if self.phase != LinePhase::Draining {
            return false;
        }
        line.set_transmitter(false);
        line.set_receiver(true);
        self.phase = LinePhase::TelemetryListening;
        true
    }

    /// Turnaround window expired: back to servo listening from any phase
    pub fn timeout<L: SerialLine>(&mut self, line: &mut L) {
        line.set_transmitter(false);
        line.set_receiver(false);
        line.set_mode(LineMode::FullDuplex);
        line.set_receiver(true);
        self.phase = LinePhase::ServoListening;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::mock::MockLine;

    #[test]
    fn test_power_on_full_duplex() {
        let mut line = MockLine::new();
        let mut arbiter = HalfDuplexArbiter::default();

        arbiter.power_on(&mut line);

        assert_eq!(line.mode(), LineMode::FullDuplex);
        assert!(line.receiver_enabled());
        assert!(!line.transmitter_enabled());
        assert_eq!(arbiter.mode(), LineMode::FullDuplex);
        assert_eq!(line.violations, 0);
    }

    #[test]
    fn test_full_cycle_never_overlaps() {
        let mut line = MockLine::new();
        let mut arbiter = HalfDuplexArbiter::default();
        arbiter.power_on(&mut line);

        assert!(arbiter.open_telemetry_window(&mut line));
        assert_eq!(line.mode(), LineMode::HalfDuplex);
        assert_eq!(line.take_armed(), Some(TURNAROUND_WINDOW_US));

        assert!(arbiter.begin_transmit(&mut line));
        assert!(line.transmitter_enabled() && !line.receiver_enabled());

        assert!(arbiter.last_byte_written(&mut line));
        assert!(line.completion_requested());

        assert!(arbiter.transmit_complete(&mut line));
        assert!(line.receiver_enabled() && !line.transmitter_enabled());
        assert_eq!(arbiter.phase(), LinePhase::TelemetryListening);

        arbiter.timeout(&mut line);
        assert_eq!(line.mode(), LineMode::FullDuplex);
        assert!(line.receiver_enabled());
        assert_eq!(arbiter.phase(), LinePhase::ServoListening);

        assert_eq!(line.violations, 0);
    }

    #[test]
    fn test_timeout_during_transmit() {
        let mut line = MockLine::new();
        let mut arbiter = HalfDuplexArbiter::default();
        arbiter.power_on(&mut line);
        arbiter.open_telemetry_window(&mut line);
        arbiter.begin_transmit(&mut line);

        arbiter.timeout(&mut line);

        assert!(!line.transmitter_enabled());
        assert!(line.receiver_enabled());
        assert_eq!(line.mode(), LineMode::FullDuplex);
        assert_eq!(line.violations, 0);
    }

    #[test]
    fn test_out_of_order_calls_ignored() {
        let mut line = MockLine::new();
        let mut arbiter = HalfDuplexArbiter::default();
        arbiter.power_on(&mut line);

        assert!(!arbiter.begin_transmit(&mut line));
        assert!(!arbiter.transmit_complete(&mut line));
        assert!(!arbiter.last_byte_written(&mut line));
        assert_eq!(arbiter.phase(), LinePhase::ServoListening);

        arbiter.open_telemetry_window(&mut line);
        assert!(!arbiter.open_telemetry_window(&mut line));
        assert_eq!(line.violations, 0);
    }
}
