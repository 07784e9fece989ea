//! Recording mock collaborators for host testing.
//!
//! These mocks have no hardware dependencies and are always compiled so that
//! both unit tests and downstream integration tests can drive a
//! [`Controller`](crate::controller::Controller) deterministically.

use core::cell::Cell;

use heapless::Vec;

use super::{ActuatorSink, DigitalLines, LineMode, PwmChannel, SensorSource, SerialLine, Watchdog};
use crate::mixing::StrobeRate;

/// Manually advanced microsecond clock
///
/// Shared by reference between a test and the mocks that need time.
#[derive(Debug, Default)]
pub struct MockClock {
    now_us: Cell<u64>,
}

impl MockClock {
    /// Create a clock at t = 0
    pub const fn new() -> Self {
        Self {
            now_us: Cell::new(0),
        }
    }

    /// Current time in microseconds
    pub fn now_us(&self) -> u64 {
        self.now_us.get()
    }

    /// Advance the clock
    pub fn advance(&self, us: u64) {
        self.now_us.set(self.now_us.get() + us);
    }
}

/// Actuator sink that remembers the last value written to every output
#[derive(Debug, Default)]
pub struct RecordingSink {
    pwm: [Option<u16>; PwmChannel::COUNT],
    active: DigitalLines,
    written: DigitalLines,
    strobe: Option<StrobeRate>,
    /// Number of PWM writes since creation
    pub pwm_writes: u32,
    /// Number of strobe timer reprogrammings since creation
    pub strobe_changes: u32,
}

impl RecordingSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value written to `channel`
    pub fn pwm(&self, channel: PwmChannel) -> Option<u16> {
        self.pwm[channel.index()]
    }

    /// Whether `line` was last driven active
    pub fn is_active(&self, line: DigitalLines) -> bool {
        self.active.contains(line)
    }

    /// Lines written at least once
    pub fn written_lines(&self) -> DigitalLines {
        self.written
    }

    /// Lines currently active
    pub fn active_lines(&self) -> DigitalLines {
        self.active
    }

    /// Last strobe rate programmed
    pub fn strobe_rate(&self) -> Option<StrobeRate> {
        self.strobe
    }
}

impl ActuatorSink for RecordingSink {
    fn set_pwm(&mut self, channel: PwmChannel, value: u16) {
        self.pwm[channel.index()] = Some(value);
        self.pwm_writes += 1;
    }

    fn set_digital(&mut self, line: DigitalLines, active: bool) {
        self.written |= line;
        self.active.set(line, active);
    }

    fn set_strobe_rate(&mut self, rate: StrobeRate) {
        self.strobe = Some(rate);
        self.strobe_changes += 1;
    }
}

/// Sensor source returning preset values
#[derive(Debug, Clone, Default)]
pub struct FixedSensors {
    values: [i32; 4],
}

impl FixedSensors {
    /// Create a source with the given values for indices 0..4
    pub const fn new(values: [i32; 4]) -> Self {
        Self { values }
    }

    /// Change the value reported for `index`
    pub fn set(&mut self, index: usize, value: i32) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
        }
    }
}

impl SensorSource for FixedSensors {
    fn value(&self, index: usize) -> i32 {
        self.values.get(index).copied().unwrap_or(0)
    }
}

/// Watchdog that counts refreshes and checks expiry against a [`MockClock`]
#[derive(Debug)]
pub struct CountingWatchdog<'a> {
    clock: &'a MockClock,
    window_us: u64,
    last_refresh_us: u64,
    /// Number of refreshes since creation
    pub refreshes: u32,
}

impl<'a> CountingWatchdog<'a> {
    /// Create a watchdog armed at the current clock time
    pub fn new(clock: &'a MockClock, window_us: u64) -> Self {
        Self {
            clock,
            window_us,
            last_refresh_us: clock.now_us(),
            refreshes: 0,
        }
    }

    /// Whether the hardware would have forced a reset by now
    pub fn expired(&self) -> bool {
        self.clock.now_us().saturating_sub(self.last_refresh_us) > self.window_us
    }
}

impl Watchdog for CountingWatchdog<'_> {
    fn refresh(&mut self) {
        self.last_refresh_us = self.clock.now_us();
        self.refreshes += 1;
    }
}

/// Serial line mock tracking enable state and transmitted bytes
///
/// Any call that would leave receiver and transmitter enabled together, or
/// rewire the line while either is enabled, is counted as a violation.
#[derive(Debug)]
pub struct MockLine {
    mode: LineMode,
    receiver: bool,
    transmitter: bool,
    completion_requested: bool,
    armed_window_us: Option<u32>,
    written: Vec<u8, 64>,
    /// Half-duplex safety violations observed
    pub violations: u32,
}

impl Default for MockLine {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLine {
    /// Create a line with everything disabled
    pub const fn new() -> Self {
        Self {
            mode: LineMode::FullDuplex,
            receiver: false,
            transmitter: false,
            completion_requested: false,
            armed_window_us: None,
            written: Vec::new(),
            violations: 0,
        }
    }

    /// Current wiring
    pub fn mode(&self) -> LineMode {
        self.mode
    }

    /// Receiver enable state
    pub fn receiver_enabled(&self) -> bool {
        self.receiver
    }

    /// Transmitter enable state
    pub fn transmitter_enabled(&self) -> bool {
        self.transmitter
    }

    /// Whether the transmit-complete interrupt is requested
    pub fn completion_requested(&self) -> bool {
        self.completion_requested
    }

    /// Window of the pending turnaround timer, cleared on read
    pub fn take_armed(&mut self) -> Option<u32> {
        self.armed_window_us.take()
    }

    /// Bytes written since the last [`MockLine::clear_written`]
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Forget transmitted bytes
    pub fn clear_written(&mut self) {
        self.written.clear();
    }
}

impl SerialLine for MockLine {
    fn set_mode(&mut self, mode: LineMode) {
        if self.receiver || self.transmitter {
            self.violations += 1;
        }
        self.mode = mode;
    }

    fn set_receiver(&mut self, enabled: bool) {
        if enabled && self.transmitter {
            self.violations += 1;
        }
        self.receiver = enabled;
    }

    fn set_transmitter(&mut self, enabled: bool) {
        if enabled && self.receiver {
            self.violations += 1;
        }
        self.transmitter = enabled;
        self.completion_requested = false;
    }

    fn write_byte(&mut self, byte: u8) {
        if !self.transmitter {
            self.violations += 1;
        }
        // Capacity is far above any reply; overflow only drops test history
        let _ = self.written.push(byte);
    }

    fn await_completion(&mut self) {
        self.completion_requested = true;
    }

    fn arm_turnaround(&mut self, window_us: u32) {
        self.armed_window_us = Some(window_us);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_tracks_lines() {
        let mut sink = RecordingSink::new();
        sink.set_digital(DigitalLines::LIGHTS, true);
        sink.set_digital(DigitalLines::FAN, false);

        assert!(sink.is_active(DigitalLines::LIGHTS));
        assert!(!sink.is_active(DigitalLines::FAN));
        assert_eq!(
            sink.written_lines(),
            DigitalLines::LIGHTS | DigitalLines::FAN
        );
    }

    #[test]
    fn test_counting_watchdog_expiry() {
        let clock = MockClock::new();
        let mut watchdog = CountingWatchdog::new(&clock, 40_000);

        clock.advance(30_000);
        assert!(!watchdog.expired());
        watchdog.refresh();

        clock.advance(40_001);
        assert!(watchdog.expired());
        assert_eq!(watchdog.refreshes, 1);
    }

    #[test]
    fn test_mock_line_flags_overlap() {
        let mut line = MockLine::new();
        line.set_receiver(true);
        line.set_transmitter(true);
        assert_eq!(line.violations, 1);

        line.set_mode(LineMode::HalfDuplex);
        assert_eq!(line.violations, 2);
    }

    #[test]
    fn test_mock_line_clean_turnaround() {
        let mut line = MockLine::new();
        line.set_mode(LineMode::HalfDuplex);
        line.set_receiver(true);
        line.set_receiver(false);
        line.set_transmitter(true);
        line.write_byte(0x55);
        line.set_transmitter(false);
        line.set_receiver(true);

        assert_eq!(line.violations, 0);
        assert_eq!(line.written(), &[0x55]);
    }
}
