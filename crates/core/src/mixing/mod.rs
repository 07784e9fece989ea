//! Control mixing engine
//!
//! Runs once per validated servo frame. The pipeline is the same for every
//! vehicle; the [`VehicleProfile`] only supplies constants and switches
//! optional behaviors on or off:
//!
//! 1. decode switches
//! 2. normalize axes (direct offsets and valve openings)
//! 3. shape pump, drive and auxiliary outputs
//! 4. ramp the pump and drive outputs
//! 5. derive digital lines (lights, direction bits, indicators, fan)
//!
//! The result is an [`ActuatorCommand`] that the caller writes to the sink
//! before refreshing the watchdog.

pub mod indicator;
pub mod input;
pub mod output;
pub mod ramp;

pub use indicator::{BlinkMode, IndicatorLevels, Indicators, StrobeRate};
pub use input::{SwitchPosition, ValveCurve};
pub use output::{BridgeCommand, DriveCurve, PumpCurve, PumpDemand, NEUTRAL};
pub use ramp::Ramp;

use crate::ibus::ChannelFrame;
use crate::profile::{DriveOutput, VehicleProfile};
use crate::sensors::FanControl;
use crate::traits::{ActuatorSink, DigitalLines, PwmChannel, SensorSource};

/// Throttle below which the vehicle counts as reversing
const REVERSE_THROTTLE: i32 = -50;

/// Digital line levels for one update
///
/// Only lines in `driven` are written; others keep their last level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineUpdate {
    driven: DigitalLines,
    active: DigitalLines,
}

impl LineUpdate {
    /// No lines driven
    pub const fn new() -> Self {
        Self {
            driven: DigitalLines::empty(),
            active: DigitalLines::empty(),
        }
    }

    /// Drive `line` to `active`
    pub fn set(&mut self, line: DigitalLines, active: bool) {
        self.driven |= line;
        self.active.set(line, active);
    }

    /// Lines this update writes
    pub fn driven(&self) -> DigitalLines {
        self.driven
    }

    /// Whether `line` is driven active
    pub fn is_active(&self, line: DigitalLines) -> bool {
        self.active.contains(line)
    }

    /// Write every driven line to the sink
    pub fn write_to<S: ActuatorSink>(&self, sink: &mut S) {
        for line in self.driven.iter() {
            sink.set_digital(line, self.active.contains(line));
        }
    }
}

/// Everything computed by one mixing cycle
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActuatorCommand {
    pwm: [Option<u16>; PwmChannel::COUNT],
    /// Digital line levels
    pub lines: LineUpdate,
    /// New strobe timer rate, set only when the blink mode changed
    pub strobe: Option<StrobeRate>,
}

impl ActuatorCommand {
    /// Empty command
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a PWM target
    pub fn set_pwm(&mut self, channel: PwmChannel, value: u16) {
        self.pwm[channel.index()] = Some(value);
    }

    /// PWM target for `channel`, if this command drives it
    pub fn pwm(&self, channel: PwmChannel) -> Option<u16> {
        self.pwm[channel.index()]
    }

    /// Apply to the sink: PWM first, then the strobe timer, then lines
    pub fn write_to<S: ActuatorSink>(&self, sink: &mut S) {
        for channel in PwmChannel::ALL {
            if let Some(value) = self.pwm(channel) {
                sink.set_pwm(channel, value);
            }
        }
        if let Some(rate) = self.strobe {
            sink.set_strobe_rate(rate);
        }
        self.lines.write_to(sink);
    }
}

/// Parameterized mixing engine with per-output ramp state
#[derive(Debug, Clone)]
pub struct MixingEngine {
    profile: &'static VehicleProfile,
    pump: Ramp,
    left: Ramp,
    right: Ramp,
    indicators: Indicators,
    fan: FanControl,
    reversing: bool,
}

impl MixingEngine {
    /// Create an engine with power-on ramp state
    pub fn new(profile: &'static VehicleProfile) -> Self {
        Self {
            profile,
            pump: Ramp::new(profile.pump.limit),
            left: Ramp::new(profile.drive.limit),
            right: Ramp::new(profile.drive.limit),
            indicators: Indicators::new(),
            fan: FanControl::new(),
            reversing: false,
        }
    }

    /// Active profile
    pub fn profile(&self) -> &'static VehicleProfile {
        self.profile
    }

    /// Indicator state
    pub fn indicators(&self) -> &Indicators {
        &self.indicators
    }

    /// Whether the last frame commanded reverse travel
    pub fn is_reversing(&self) -> bool {
        self.reversing
    }

    /// Electrically safe state: every output idle, every line inactive
    ///
    /// Also starts the strobe timer at the blink rate, since the beeper
    /// ticks from it before any indicator mode is selected.
    pub fn idle_command(&self) -> ActuatorCommand {
        let mut command = ActuatorCommand::new();
        for channel in self.profile.pwm_channels() {
            command.set_pwm(channel, self.profile.idle_pwm(channel));
        }
        for line in self.profile.digital_lines().iter() {
            command.lines.set(line, false);
        }
        if self.profile.uses_strobe() {
            command.strobe = Some(StrobeRate::Normal);
        }
        command
    }

    /// Run one mixing cycle on a validated frame
    pub fn mix<Q: SensorSource>(&mut self, frame: &ChannelFrame, sensors: &Q) -> ActuatorCommand {
        let profile = self.profile;
        let switch = |index: usize| {
            profile
                .switch_channels
                .get(index)
                .map(|&channel| SwitchPosition::decode(frame.get(channel)))
                .unwrap_or_default()
        };
        let mut command = ActuatorCommand::new();

        // Valves: summed opening feeds the pump, trimmed raw drives servos
        let mut opening = 0;
        for valve in &profile.valves {
            let raw = frame.get(valve.channel);
            opening += profile.valve_curve.opening(raw);
            if let Some(channel) = valve.output {
                command.set_pwm(channel, input::trimmed(raw, valve.trim));
            }
        }
        let throttle = input::centered(frame.get(profile.throttle_channel));
        let steering = input::centered(frame.get(profile.steering_channel));

        let pump = profile.pump.shape(opening);
        command.set_pwm(PwmChannel::Pump, to_ticks(self.pump.step(pump.target)));

        let left = self.left.step(profile.drive.shape(throttle + steering));
        let right = self.right.step(profile.drive.shape(throttle - steering));
        match profile.drive_output {
            DriveOutput::Servo => {
                command.set_pwm(PwmChannel::TrackLeft, to_ticks(left));
                command.set_pwm(PwmChannel::TrackRight, to_ticks(right));
            }
            DriveOutput::HBridge => {
                let left = output::bridge(left, profile.drive.min);
                let right = output::bridge(right, profile.drive.min);
                command.set_pwm(PwmChannel::TrackLeft, left.duty);
                command.set_pwm(PwmChannel::TrackRight, right.duty);
                command.lines.set(DigitalLines::LEFT_FORWARD, left.forward);
                command.lines.set(DigitalLines::LEFT_REVERSE, left.reverse);
                command.lines.set(DigitalLines::RIGHT_FORWARD, right.forward);
                command.lines.set(DigitalLines::RIGHT_REVERSE, right.reverse);
            }
        }

        if let Some(selector) = profile.selector {
            let value = output::selector(
                switch(selector.raise_switch).is_engaged(),
                switch(selector.lower_switch).is_engaged(),
            );
            command.set_pwm(PwmChannel::Selector, to_ticks(value));
        }
        if profile.auxiliary {
            let activity = opening + throttle.abs() + steering.abs();
            command.set_pwm(PwmChannel::Auxiliary, to_ticks(output::auxiliary(activity)));
        }

        self.reversing = throttle < REVERSE_THROTTLE;
        command
            .lines
            .set(DigitalLines::LIGHTS, switch(profile.lights_switch).is_engaged());
        if profile.reverse_lamp {
            command.lines.set(DigitalLines::REVERSE_LAMP, self.reversing);
        }
        if profile.pump_load_line {
            command.lines.set(DigitalLines::PUMP_LOAD, pump.engaged);
        }
        if let Some(config) = profile.indicators {
            let hazard = switch(config.hazard_switch);
            if let Some(rate) = self.indicators.select(hazard, throttle, steering) {
                command.strobe = Some(rate);
                command.lines.set(DigitalLines::INDICATOR_LEFT, false);
                command.lines.set(DigitalLines::INDICATOR_RIGHT, false);
            }
        }
        if let Some(config) = profile.fan {
            let on = self.fan.update(&config, sensors.value(config.sensor));
            command.lines.set(DigitalLines::FAN, on);
        }

        command
    }

    /// Advance indicators and beeper by one strobe timer period
    pub fn strobe_tick(&mut self) -> LineUpdate {
        let mut lines = LineUpdate::new();
        if self.profile.indicators.is_none() && !self.profile.reverse_buzzer {
            return lines;
        }
        let levels = self.indicators.tick(self.reversing);
        if self.profile.indicators.is_some() {
            lines.set(DigitalLines::INDICATOR_LEFT, levels.left);
            lines.set(DigitalLines::INDICATOR_RIGHT, levels.right);
        }
        if self.profile.reverse_buzzer {
            lines.set(DigitalLines::BUZZER, levels.buzzer);
        }
        lines
    }
}

fn to_ticks(value: i32) -> u16 {
    value.clamp(0, u16::MAX as i32) as u16
}
