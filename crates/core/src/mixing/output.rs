//! Output shaping curves
//!
//! Targets are servo ticks around [`NEUTRAL`] (1500). Ramping is applied by
//! the caller after shaping.

/// Neutral output value
pub const NEUTRAL: i32 = 1500;

/// Largest deflection of a servo-style output from neutral
pub const FULL_SCALE: i32 = 500;

/// Pump duty curve
///
/// Unidirectional: zero demand stops the pump, any demand starts it at
/// `min` above neutral and the sum is capped at `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PumpCurve {
    /// Minimum duty once engaged
    pub min: i32,
    /// Maximum duty
    pub max: i32,
    /// Ramp step per cycle
    pub limit: i32,
}

/// Shaped pump demand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PumpDemand {
    /// Unramped pump target
    pub target: i32,
    /// Pump is running (drives the load solenoid)
    pub engaged: bool,
}

impl PumpCurve {
    /// Shape the summed valve opening
    pub fn shape(&self, opening: i32) -> PumpDemand {
        if opening == 0 {
            return PumpDemand {
                target: NEUTRAL,
                engaged: false,
            };
        }
        PumpDemand {
            target: NEUTRAL + (opening + self.min).min(self.max),
            engaged: true,
        }
    }
}

/// Bidirectional drive curve with a center dead zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveCurve {
    /// Dead zone half-width; also the minimum duty once moving
    pub min: i32,
    /// Maximum duty in either direction
    pub max: i32,
    /// Ramp step per cycle
    pub limit: i32,
}

impl DriveCurve {
    /// Shape a signed drive demand
    pub fn shape(&self, demand: i32) -> i32 {
        if demand.abs() < self.min {
            return NEUTRAL;
        }
        NEUTRAL + demand.clamp(-self.max, self.max)
    }
}

/// Duty and direction for one H-bridge channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BridgeCommand {
    /// Duty magnitude, 0..500
    pub duty: u16,
    pub forward: bool,
    pub reverse: bool,
}

/// Split a servo-style drive value into H-bridge duty and direction
pub fn bridge(value: i32, dead_zone: i32) -> BridgeCommand {
    if value < NEUTRAL - dead_zone {
        BridgeCommand {
            duty: (NEUTRAL - value) as u16,
            forward: false,
            reverse: true,
        }
    } else if value > NEUTRAL + dead_zone {
        BridgeCommand {
            duty: (value - NEUTRAL) as u16,
            forward: true,
            reverse: false,
        }
    } else {
        BridgeCommand::default()
    }
}

/// Three-position selector output
pub fn selector(raise: bool, lower: bool) -> i32 {
    if raise {
        NEUTRAL + FULL_SCALE
    } else if lower {
        NEUTRAL - FULL_SCALE
    } else {
        NEUTRAL
    }
}

/// Proportional auxiliary output from a non-negative activity sum
pub fn auxiliary(activity: i32) -> i32 {
    NEUTRAL + activity.clamp(0, FULL_SCALE)
}
