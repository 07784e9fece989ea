//! Turn indicators, strobe pattern and reverse beeper
//!
//! The blink mode is chosen once per servo frame. Lamps and beeper advance
//! on strobe timer ticks, whose rate is reprogrammed only when the mode
//! changes so a running blink keeps its phase.

use super::input::SwitchPosition;

/// Throttle below which the indicators are cancelled (braking hard)
const CANCEL_THROTTLE: i32 = -100;

/// Steering magnitude below which the indicators are cancelled
const CANCEL_STEERING: i32 = 50;

/// Throttle above which a turn may be signalled
const TURN_THROTTLE: i32 = -50;

/// Steering magnitude that signals a turn
const TURN_STEERING: i32 = 250;

/// Strobe ticks per pattern step
const PATTERN_STEP: u32 = 8;

/// Indicator blink mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlinkMode {
    #[default]
    Off,
    Left,
    Right,
    Hazard,
    /// Fast alternating pattern
    Strobe,
}

impl BlinkMode {
    fn rate(self) -> StrobeRate {
        match self {
            BlinkMode::Strobe => StrobeRate::Fast,
            _ => StrobeRate::Normal,
        }
    }

    fn blinks_left(self) -> bool {
        matches!(self, BlinkMode::Left | BlinkMode::Hazard)
    }

    fn blinks_right(self) -> bool {
        matches!(self, BlinkMode::Right | BlinkMode::Hazard)
    }
}

/// Strobe timer rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrobeRate {
    /// Turn signal rate, about 3 ticks per second
    Normal,
    /// Strobe rate, about 24 ticks per second
    Fast,
}

/// Lamp and beeper levels after a strobe tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndicatorLevels {
    pub left: bool,
    pub right: bool,
    pub buzzer: bool,
}

/// Indicator state machine
#[derive(Debug, Clone, Default)]
pub struct Indicators {
    mode: BlinkMode,
    left_blinking: bool,
    right_blinking: bool,
    levels: IndicatorLevels,
    ticks: u32,
}

impl Indicators {
    /// All lamps off
    pub fn new() -> Self {
        Self::default()
    }

    /// Current blink mode
    pub fn mode(&self) -> BlinkMode {
        self.mode
    }

    /// Current lamp and beeper levels
    pub fn levels(&self) -> IndicatorLevels {
        self.levels
    }

    /// Pick the blink mode from the hazard switch and stick position
    ///
    /// Returns the new strobe rate when the mode changed; both lamps are then
    /// forced dark and restart from the off phase.
    pub fn select(&mut self, hazard: SwitchPosition, throttle: i32, steering: i32) -> Option<StrobeRate> {
        let mode = match hazard {
            SwitchPosition::Middle => BlinkMode::Hazard,
            SwitchPosition::High => BlinkMode::Strobe,
            SwitchPosition::Low => {
                if throttle < CANCEL_THROTTLE || steering.abs() < CANCEL_STEERING {
                    BlinkMode::Off
                } else if throttle > TURN_THROTTLE && steering < -TURN_STEERING {
                    BlinkMode::Left
                } else if throttle > TURN_THROTTLE && steering > TURN_STEERING {
                    BlinkMode::Right
                } else {
                    self.mode
                }
            }
        };

        if mode == self.mode {
            return None;
        }
        self.mode = mode;
        self.left_blinking = mode.blinks_left();
        self.right_blinking = mode.blinks_right();
        self.levels.left = false;
        self.levels.right = false;
        Some(mode.rate())
    }

    /// Advance one strobe timer period
    pub fn tick(&mut self, reversing: bool) -> IndicatorLevels {
        let mut pattern_step = true;
        if self.mode == BlinkMode::Strobe {
            self.ticks = self.ticks.wrapping_add(1);
            if self.ticks % PATTERN_STEP == 0 {
                let n = self.ticks;
                let (left, right) = if n & 0x20 != 0 {
                    (n & 0x08 != 0, n & 0x10 != 0)
                } else {
                    (n & 0x10 != 0, n & 0x08 != 0)
                };
                self.left_blinking = left;
                self.right_blinking = right;
            } else {
                pattern_step = false;
            }
        }

        self.levels.left = self.left_blinking && !self.levels.left;
        self.levels.right = self.right_blinking && !self.levels.right;

        // The beeper follows the pattern steps while strobing
        if pattern_step {
            self.levels.buzzer = reversing && !self.levels.buzzer;
        }
        self.levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_signals() {
        let mut indicators = Indicators::new();

        assert_eq!(
            indicators.select(SwitchPosition::Low, 100, -300),
            Some(StrobeRate::Normal)
        );
        assert_eq!(indicators.mode(), BlinkMode::Left);

        assert_eq!(
            indicators.select(SwitchPosition::Low, 100, 300),
            Some(StrobeRate::Normal)
        );
        assert_eq!(indicators.mode(), BlinkMode::Right);
    }

    #[test]
    fn test_mode_held_between_thresholds() {
        let mut indicators = Indicators::new();
        indicators.select(SwitchPosition::Low, 0, 300);

        // Steering eased back but not centered
        assert_eq!(indicators.select(SwitchPosition::Low, 0, 120), None);
        assert_eq!(indicators.mode(), BlinkMode::Right);

        // Reversing slowly keeps the signal
        assert_eq!(indicators.select(SwitchPosition::Low, -80, 300), None);
        assert_eq!(indicators.mode(), BlinkMode::Right);
    }

    #[test]
    fn test_cancel_on_center_or_braking() {
        let mut indicators = Indicators::new();
        indicators.select(SwitchPosition::Low, 0, 300);
        indicators.select(SwitchPosition::Low, 0, 10);
        assert_eq!(indicators.mode(), BlinkMode::Off);

        indicators.select(SwitchPosition::Low, 0, -300);
        indicators.select(SwitchPosition::Low, -150, -300);
        assert_eq!(indicators.mode(), BlinkMode::Off);
    }

    #[test]
    fn test_switch_forces_hazard_and_strobe() {
        let mut indicators = Indicators::new();

        assert_eq!(
            indicators.select(SwitchPosition::Middle, 0, 0),
            Some(StrobeRate::Normal)
        );
        assert_eq!(indicators.mode(), BlinkMode::Hazard);

        assert_eq!(
            indicators.select(SwitchPosition::High, 0, 0),
            Some(StrobeRate::Fast)
        );
        assert_eq!(indicators.mode(), BlinkMode::Strobe);
    }

    #[test]
    fn test_hazard_blinks_both_in_phase() {
        let mut indicators = Indicators::new();
        indicators.select(SwitchPosition::Middle, 0, 0);

        let first = indicators.tick(false);
        assert!(first.left && first.right);
        let second = indicators.tick(false);
        assert!(!second.left && !second.right);
    }

    #[test]
    fn test_left_blink_leaves_right_dark() {
        let mut indicators = Indicators::new();
        indicators.select(SwitchPosition::Low, 0, -300);

        for _ in 0..6 {
            let levels = indicators.tick(false);
            assert!(!levels.right);
        }
    }

    #[test]
    fn test_mode_change_darkens_lamps() {
        let mut indicators = Indicators::new();
        indicators.select(SwitchPosition::Middle, 0, 0);
        indicators.tick(false);
        assert!(indicators.levels().left);

        indicators.select(SwitchPosition::Low, 0, 300);
        assert!(!indicators.levels().left);
        assert!(!indicators.levels().right);
    }

    #[test]
    fn test_strobe_pattern_alternates() {
        let mut indicators = Indicators::new();
        indicators.select(SwitchPosition::High, 0, 0);

        // Lamps stay dark until the first pattern step
        for _ in 0..7 {
            let levels = indicators.tick(false);
            assert!(!levels.left && !levels.right);
        }
        // Tick 8: n & 0x08 set, n & 0x20 clear -> right side
        let levels = indicators.tick(false);
        assert!(!levels.left && levels.right);

        // Tick 16: n & 0x10 set -> left side
        for _ in 0..8 {
            indicators.tick(false);
        }
        assert!(indicators.left_blinking && !indicators.right_blinking);
    }

    #[test]
    fn test_reverse_beeper_toggles() {
        let mut indicators = Indicators::new();

        assert!(indicators.tick(true).buzzer);
        assert!(!indicators.tick(true).buzzer);
        assert!(indicators.tick(true).buzzer);
        assert!(!indicators.tick(false).buzzer);
        assert!(!indicators.tick(false).buzzer);
    }
}
