//! Channel input normalization

/// Channel value at stick center
pub const CENTER: i32 = 1500;

/// Switch channels read Low below this value
const SWITCH_LOW: u16 = 1450;

/// Switch channels read High above this value
const SWITCH_HIGH: u16 = 1550;

/// Three-position switch state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwitchPosition {
    #[default]
    Low,
    Middle,
    High,
}

impl SwitchPosition {
    /// Decode a raw switch channel
    pub fn decode(raw: u16) -> Self {
        if raw < SWITCH_LOW {
            SwitchPosition::Low
        } else if raw > SWITCH_HIGH {
            SwitchPosition::High
        } else {
            SwitchPosition::Middle
        }
    }

    /// Switch moved out of its rest position
    pub fn is_engaged(self) -> bool {
        self != SwitchPosition::Low
    }
}

/// Signed deflection from center (direct axis)
pub fn centered(raw: u16) -> i32 {
    raw as i32 - CENTER
}

/// Proportional valve flow curve
///
/// Maps stick deflection to a valve opening magnitude: nothing inside the
/// dead zone, a first slope up to `breakpoint`, then a second slope from the
/// breakpoint on. Gains are percentages applied to the deflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValveCurve {
    /// Deflection at which the valve is still closed
    pub closed: i32,
    /// Start of the second segment, if any
    pub breakpoint: Option<i32>,
    /// Gain in percent
    pub gain: i32,
}

impl ValveCurve {
    /// Opening magnitude for a raw channel value, independent of direction
    pub fn opening(&self, raw: u16) -> i32 {
        let deflection = centered(raw).abs();
        if deflection < self.closed {
            return 0;
        }
        match self.breakpoint {
            Some(breakpoint) if deflection >= breakpoint => {
                let knee = (self.closed + breakpoint) / 2;
                div_ceil(self.gain * (deflection - knee), 100)
            }
            _ => div_ceil(self.gain * (deflection - self.closed), 200),
        }
    }
}

/// Raw value plus a fixed trim offset, for valves driven as servos
pub fn trimmed(raw: u16, trim: i16) -> u16 {
    (raw as i32 + trim as i32).clamp(0, u16::MAX as i32) as u16
}

// Rounds up so a deflection just past the dead zone always opens the valve
fn div_ceil(numerator: i32, denominator: i32) -> i32 {
    (numerator + denominator - 1) / denominator
}
