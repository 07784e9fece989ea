//! Board wiring
//!
//! Pin numbers are flat across ports: A0..A15 are 0..15, B0..B15 are
//! 16..31, F0..F15 are 32..47.

use rc_hydraulic_core::traits::{DigitalLines, PwmChannel};

use crate::platform::traits::Polarity;

const PA1: u8 = 1;
const PA4: u8 = 4;
const PA5: u8 = 5;
const PA6: u8 = 6;
const PA7: u8 = 7;
const PA8: u8 = 8;
const PA9: u8 = 9;
const PA10: u8 = 10;
const PA11: u8 = 11;
const PA13: u8 = 13;
const PA14: u8 = 14;
const PB1: u8 = 17;
const PF0: u8 = 32;
const PF1: u8 = 33;

/// 250 Hz servo frame (TIM3, TIM14)
const FAST_SERVO_US: u16 = 4_000;
/// 125 Hz servo frame (TIM1)
const SLOW_SERVO_US: u16 = 8_000;

/// One digital line on one pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePin {
    pub line: DigitalLines,
    pub pin: u8,
    pub polarity: Polarity,
}

impl LinePin {
    const fn high(line: DigitalLines, pin: u8) -> Self {
        Self {
            line,
            pin,
            polarity: Polarity::ActiveHigh,
        }
    }

    const fn low(line: DigitalLines, pin: u8) -> Self {
        Self {
            line,
            pin,
            polarity: Polarity::ActiveLow,
        }
    }
}

/// Peripheral assignment of one controller board
#[derive(Debug, Clone, Copy)]
pub struct BoardPins {
    /// UART carrying the iBUS link
    pub uart: u8,
    /// Timer for the telemetry turnaround window
    pub turnaround_timer: u8,
    /// Timer raising strobe ticks
    pub strobe_timer: u8,
    /// Output pin per PWM channel, indexed by [`PwmChannel::index`]
    pub pwm: [Option<u8>; PwmChannel::COUNT],
    /// Servo frame period of the timer behind each PWM channel
    pub servo_period_us: [u16; PwmChannel::COUNT],
    /// Digital line pins
    pub lines: &'static [LinePin],
    /// Beeper tone output
    pub buzzer: Option<u8>,
}

impl BoardPins {
    /// Pin wired to `channel`
    pub fn pwm_pin(&self, channel: PwmChannel) -> Option<u8> {
        self.pwm[channel.index()]
    }

    /// Servo frame period of the timer driving `channel`
    pub fn servo_period_us(&self, channel: PwmChannel) -> u16 {
        self.servo_period_us[channel.index()]
    }
}

/// Loader board: pump servo, two H-bridges, indicator lamps and beeper
pub const LOADER_BOARD: BoardPins = BoardPins {
    uart: 0,
    turnaround_timer: 0,
    strobe_timer: 1,
    pwm: [None, None, None, Some(PA4), Some(PA9), Some(PA10), None, None],
    // Tracks run as H-bridges; only the pump uses a servo frame
    servo_period_us: [FAST_SERVO_US; PwmChannel::COUNT],
    lines: &[
        LinePin::high(DigitalLines::LIGHTS, PA14),
        LinePin::low(DigitalLines::REVERSE_LAMP, PA13),
        LinePin::high(DigitalLines::LEFT_FORWARD, PA1),
        LinePin::high(DigitalLines::LEFT_REVERSE, PA5),
        LinePin::high(DigitalLines::RIGHT_FORWARD, PF0),
        LinePin::high(DigitalLines::RIGHT_REVERSE, PF1),
        LinePin::high(DigitalLines::INDICATOR_LEFT, PA6),
        LinePin::high(DigitalLines::INDICATOR_RIGHT, PB1),
    ],
    buzzer: Some(PA7),
};

/// Excavator board: eight servo outputs, pump load solenoid and fan
pub const EXCAVATOR_BOARD: BoardPins = BoardPins {
    uart: 0,
    turnaround_timer: 0,
    strobe_timer: 1,
    pwm: [
        Some(PA6),
        Some(PA7),
        Some(PB1),
        Some(PA4),
        Some(PA9),
        Some(PA10),
        Some(PA8),
        Some(PA11),
    ],
    // Valves and pump on TIM3/TIM14, drive and selector outputs on TIM1
    servo_period_us: [
        FAST_SERVO_US,
        FAST_SERVO_US,
        FAST_SERVO_US,
        FAST_SERVO_US,
        SLOW_SERVO_US,
        SLOW_SERVO_US,
        SLOW_SERVO_US,
        SLOW_SERVO_US,
    ],
    lines: &[
        LinePin::high(DigitalLines::LIGHTS, PA14),
        LinePin::low(DigitalLines::PUMP_LOAD, PA13),
        LinePin::high(DigitalLines::FAN, PA5),
    ],
    buzzer: None,
};

#[cfg(test)]
mod tests {
    use super::*;
    use rc_hydraulic_core::profile::{VehicleProfile, EXCAVATOR, LOADER};

    fn covers(board: &BoardPins, profile: &VehicleProfile) -> bool {
        let lines = board
            .lines
            .iter()
            .fold(DigitalLines::empty(), |acc, pin| acc | pin.line);
        let mut wired = lines;
        if board.buzzer.is_some() {
            wired |= DigitalLines::BUZZER;
        }
        profile
            .pwm_channels()
            .all(|channel| board.pwm_pin(channel).is_some())
            && wired.contains(profile.digital_lines())
    }

    fn pins_unique(board: &BoardPins) -> bool {
        let mut seen = 0u64;
        let pins = board
            .pwm
            .iter()
            .flatten()
            .copied()
            .chain(board.lines.iter().map(|l| l.pin))
            .chain(board.buzzer);
        for pin in pins {
            if seen & (1 << pin) != 0 {
                return false;
            }
            seen |= 1 << pin;
        }
        true
    }

    #[test]
    fn test_boards_cover_profiles() {
        assert!(covers(&LOADER_BOARD, &LOADER));
        assert!(covers(&EXCAVATOR_BOARD, &EXCAVATOR));
    }

    #[test]
    fn test_excavator_drive_timer_runs_slower() {
        assert_eq!(EXCAVATOR_BOARD.servo_period_us(PwmChannel::Valve1), 4_000);
        assert_eq!(EXCAVATOR_BOARD.servo_period_us(PwmChannel::Pump), 4_000);
        assert_eq!(EXCAVATOR_BOARD.servo_period_us(PwmChannel::TrackLeft), 8_000);
        assert_eq!(EXCAVATOR_BOARD.servo_period_us(PwmChannel::Auxiliary), 8_000);
        assert_eq!(LOADER_BOARD.servo_period_us(PwmChannel::Pump), 4_000);
        for board in [&LOADER_BOARD, &EXCAVATOR_BOARD] {
            assert!(board.servo_period_us.iter().all(|&period| period > 2_000));
        }
    }

    #[test]
    fn test_pins_unique() {
        assert!(pins_unique(&LOADER_BOARD));
        assert!(pins_unique(&EXCAVATOR_BOARD));
    }
}
