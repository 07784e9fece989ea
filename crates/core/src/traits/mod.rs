//! Hardware seams for the protocol and mixing logic.
//!
//! The controller never touches registers. Every side effect goes through one
//! of the traits below, implemented once per target platform (in the root
//! crate) and once as a recording mock (in [`mock`]) for host tests.
//!
//! # Design
//!
//! - Trait definitions are pure and have no feature gates
//! - Methods are infallible: they model register writes that cannot fail, and
//!   platform adapters log any lower-level fault instead of propagating it
//! - Mock implementations are always available for host testing

pub mod mock;

use bitflags::bitflags;

use crate::mixing::StrobeRate;

/// PWM output channels driven by the mixing engine
///
/// Values written to these channels use firmware ticks: 1000..2000 for
/// servo-style outputs (1500 = neutral) and 0..500 for H-bridge duty
/// magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmChannel {
    /// First proportional valve (bucket)
    Valve1,
    /// Second proportional valve (lift arm / boom)
    Valve2,
    /// Third proportional valve (ripper / stick)
    Valve3,
    /// Hydraulic pump motor
    Pump,
    /// Left track or wheel drive
    TrackLeft,
    /// Right track or wheel drive
    TrackRight,
    /// Three-position selector output (swing / auxiliary hydraulics)
    Selector,
    /// Proportional auxiliary output (engine sound, cooling)
    Auxiliary,
}

impl PwmChannel {
    /// Number of distinct PWM channels
    pub const COUNT: usize = 8;

    /// All channels in index order
    pub const ALL: [PwmChannel; Self::COUNT] = [
        PwmChannel::Valve1,
        PwmChannel::Valve2,
        PwmChannel::Valve3,
        PwmChannel::Pump,
        PwmChannel::TrackLeft,
        PwmChannel::TrackRight,
        PwmChannel::Selector,
        PwmChannel::Auxiliary,
    ];

    /// Stable array index for per-channel tables
    pub const fn index(self) -> usize {
        self as usize
    }
}

bitflags! {
    /// Discrete digital output lines
    ///
    /// Each flag names one physical line. Levels are logical ("active"); the
    /// platform adapter owns the electrical polarity of each pin.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DigitalLines: u16 {
        /// Work lights (switch controlled)
        const LIGHTS = 1 << 0;
        /// Reverse lamp, active while reversing
        const REVERSE_LAMP = 1 << 1;
        /// Pump load solenoid, active while any valve is open
        const PUMP_LOAD = 1 << 2;
        /// Left H-bridge forward input
        const LEFT_FORWARD = 1 << 3;
        /// Left H-bridge reverse input
        const LEFT_REVERSE = 1 << 4;
        /// Right H-bridge forward input
        const RIGHT_FORWARD = 1 << 5;
        /// Right H-bridge reverse input
        const RIGHT_REVERSE = 1 << 6;
        /// Left turn indicator lamp
        const INDICATOR_LEFT = 1 << 7;
        /// Right turn indicator lamp
        const INDICATOR_RIGHT = 1 << 8;
        /// Reverse beeper
        const BUZZER = 1 << 9;
        /// Cooling fan
        const FAN = 1 << 10;
    }
}

/// Actuator output sink (PWM compare registers and GPIO lines)
pub trait ActuatorSink {
    /// Set the target value of a PWM channel in firmware ticks
    fn set_pwm(&mut self, channel: PwmChannel, value: u16);

    /// Drive a single digital line
    ///
    /// `line` always carries exactly one flag.
    fn set_digital(&mut self, line: DigitalLines, active: bool);

    /// Reprogram the indicator strobe timer
    ///
    /// Called only when the blink pattern changes, never on every cycle, so
    /// the running blink phase is not disturbed.
    fn set_strobe_rate(&mut self, rate: StrobeRate);
}

/// Onboard sensor values by table index
pub trait SensorSource {
    /// Current value of sensor `index` in iBUS units
    fn value(&self, index: usize) -> i32;

    /// Accept a fresh raw ADC sample for sensor `index`
    ///
    /// Sources that obtain their values some other way ignore it.
    fn record(&mut self, _index: usize, _raw: u16) {}
}

/// Hardware watchdog
pub trait Watchdog {
    /// Rearm the watchdog counter
    fn refresh(&mut self);
}

/// Electrical configuration of the shared serial line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMode {
    /// Listening for servo frames on the RX pin, transmitter unused
    FullDuplex,
    /// Single-wire mode on the TX pin for sensor requests and replies
    HalfDuplex,
}

/// Serial line control for the single receiver port
///
/// The arbiter guarantees that `set_mode` is only called with both the
/// receiver and the transmitter disabled, and that the two are never enabled
/// at the same time.
pub trait SerialLine {
    /// Switch the line between full-duplex and half-duplex wiring
    fn set_mode(&mut self, mode: LineMode);

    /// Enable or disable the receiver (with its byte-received interrupt)
    fn set_receiver(&mut self, enabled: bool);

    /// Enable or disable the transmitter
    ///
    /// Enabling it must make the platform raise `Event::TransmitReady` each
    /// time the data register can accept a byte.
    fn set_transmitter(&mut self, enabled: bool);

    /// Load one byte into the transmit data register
    fn write_byte(&mut self, byte: u8);

    /// Stop requesting data and raise `Event::TransmitComplete` once the
    /// final byte has physically left the wire
    fn await_completion(&mut self);

    /// Start the one-shot turnaround timer, raising `Event::RxTimeout` after
    /// `window_us` microseconds
    fn arm_turnaround(&mut self, window_us: u32);
}
