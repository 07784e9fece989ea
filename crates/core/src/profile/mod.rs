//! Vehicle profiles
//!
//! A profile is the complete parameter set of one model: which receiver
//! channel drives which function, curve constants, ramp limits and the
//! optional behaviors it carries. Exactly one profile is selected at build
//! time and it never changes at runtime.

mod excavator;
mod loader;

pub use excavator::EXCAVATOR;
pub use loader::LOADER;

use crate::mixing::output::NEUTRAL;
use crate::mixing::{DriveCurve, PumpCurve, ValveCurve};
use crate::sensors::{FanConfig, SensorDescriptor};
use crate::traits::{DigitalLines, PwmChannel};

/// One valve stick axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValveAxis {
    /// Receiver channel
    pub channel: usize,
    /// Offset added when the raw value drives a valve servo
    pub trim: i16,
    /// Servo output fed with the trimmed raw value, if any
    pub output: Option<PwmChannel>,
}

/// How track drive values reach the hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveOutput {
    /// Servo pulse around 1500 (ESC input)
    Servo,
    /// Duty magnitude plus forward/reverse lines per track
    HBridge,
}

/// Three-position selector output driven by two switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorConfig {
    /// Switch index selecting the high position (takes priority)
    pub raise_switch: usize,
    /// Switch index selecting the low position
    pub lower_switch: usize,
}

/// Turn indicator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorConfig {
    /// Switch index forcing hazard (middle) or strobe (high)
    pub hazard_switch: usize,
}

/// Complete parameter set for one vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleProfile {
    pub name: &'static str,
    /// Receiver channels decoded as three-position switches, by switch index
    pub switch_channels: &'static [usize],
    pub valves: [ValveAxis; 3],
    pub valve_curve: ValveCurve,
    pub throttle_channel: usize,
    pub steering_channel: usize,
    pub pump: PumpCurve,
    pub drive: DriveCurve,
    pub drive_output: DriveOutput,
    pub selector: Option<SelectorConfig>,
    /// Proportional activity output
    pub auxiliary: bool,
    /// Switch index driving the lights line
    pub lights_switch: usize,
    pub reverse_lamp: bool,
    pub pump_load_line: bool,
    pub indicators: Option<IndicatorConfig>,
    pub reverse_buzzer: bool,
    pub fan: Option<FanConfig>,
    /// Telemetry sensor table, in address order
    pub sensors: &'static [SensorDescriptor],
}

impl VehicleProfile {
    /// PWM channels this profile drives
    pub fn pwm_channels(&self) -> impl Iterator<Item = PwmChannel> + '_ {
        PwmChannel::ALL.into_iter().filter(move |&channel| self.drives(channel))
    }

    /// Whether the profile drives `channel`
    pub fn drives(&self, channel: PwmChannel) -> bool {
        match channel {
            PwmChannel::Valve1 | PwmChannel::Valve2 | PwmChannel::Valve3 => {
                self.valves.iter().any(|valve| valve.output == Some(channel))
            }
            PwmChannel::Pump | PwmChannel::TrackLeft | PwmChannel::TrackRight => true,
            PwmChannel::Selector => self.selector.is_some(),
            PwmChannel::Auxiliary => self.auxiliary,
        }
    }

    /// Output value that leaves `channel` at rest
    pub fn idle_pwm(&self, channel: PwmChannel) -> u16 {
        match (channel, self.drive_output) {
            (PwmChannel::TrackLeft | PwmChannel::TrackRight, DriveOutput::HBridge) => 0,
            _ => NEUTRAL as u16,
        }
    }

    /// Digital lines this profile drives
    pub fn digital_lines(&self) -> DigitalLines {
        let mut lines = DigitalLines::LIGHTS;
        lines.set(DigitalLines::REVERSE_LAMP, self.reverse_lamp);
        lines.set(DigitalLines::PUMP_LOAD, self.pump_load_line);
        lines.set(
            DigitalLines::LEFT_FORWARD
                | DigitalLines::LEFT_REVERSE
                | DigitalLines::RIGHT_FORWARD
                | DigitalLines::RIGHT_REVERSE,
            self.drive_output == DriveOutput::HBridge,
        );
        lines.set(
            DigitalLines::INDICATOR_LEFT | DigitalLines::INDICATOR_RIGHT,
            self.indicators.is_some(),
        );
        lines.set(DigitalLines::BUZZER, self.reverse_buzzer);
        lines.set(DigitalLines::FAN, self.fan.is_some());
        lines
    }

    /// Whether the strobe timer has anything to drive
    pub fn uses_strobe(&self) -> bool {
        self.indicators.is_some() || self.reverse_buzzer
    }
}
