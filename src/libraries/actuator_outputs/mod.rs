//! Actuator outputs over platform PWM, GPIO and timer peripherals
//!
//! [`PlatformActuators`] is the [`ActuatorSink`] the controller writes to.
//! PWM channels map one-to-one onto compare registers: the peripheral
//! configuration decides what a value means (pulse width in µs for servo
//! outputs, drive magnitude for H-bridge outputs). Digital lines map onto
//! pins with a per-pin polarity. The beeper may be a tone PWM instead of a
//! pin, and the strobe rate reprograms a periodic timer.
//!
//! Platform faults are not recoverable here. The first occurrence of each
//! distinct fault is logged and counted; the watchdog covers a dead loop.

use heapless::Vec;
use rc_hydraulic_core::mixing::StrobeRate;
use rc_hydraulic_core::traits::{ActuatorSink, DigitalLines, PwmChannel};

use crate::parameters;
use crate::platform::traits::{GpioInterface, Polarity, PwmInterface, TimerInterface};
use crate::platform::{PlatformError, Result};

/// Maximum number of bound digital lines (one per flag)
pub const MAX_LINES: usize = 11;

/// One digital line bound to a pin
struct LineBinding<G> {
    line: DigitalLines,
    pin: G,
    polarity: Polarity,
}

/// [`ActuatorSink`] over platform peripherals
///
/// Unbound channels and lines are silently ignored, so a board only wires
/// what its profile uses.
pub struct PlatformActuators<P, G, T> {
    pwm: [Option<P>; PwmChannel::COUNT],
    lines: Vec<LineBinding<G>, MAX_LINES>,
    buzzer: Option<P>,
    strobe_timer: Option<T>,
    strobe_rate: Option<StrobeRate>,
    last_fault: Option<PlatformError>,
    faults: u32,
}

impl<P, G, T> PlatformActuators<P, G, T>
where
    P: PwmInterface,
    G: GpioInterface,
    T: TimerInterface,
{
    /// Create an adapter with nothing bound
    pub fn new() -> Self {
        Self {
            pwm: core::array::from_fn(|_| None),
            lines: Vec::new(),
            buzzer: None,
            strobe_timer: None,
            strobe_rate: None,
            last_fault: None,
            faults: 0,
        }
    }

    /// Bind a PWM channel and enable its output
    pub fn bind_pwm(&mut self, channel: PwmChannel, mut output: P) {
        output.enable();
        self.pwm[channel.index()] = Some(output);
    }

    /// Bind a digital line to a pin, driven inactive immediately
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::ResourceUnavailable` if `line` is not a single
    /// flag or is already bound.
    pub fn bind_line(&mut self, line: DigitalLines, mut pin: G, polarity: Polarity) -> Result<()> {
        if line.bits().count_ones() != 1 || self.lines.iter().any(|b| b.line == line) {
            return Err(PlatformError::ResourceUnavailable);
        }
        pin.set_active(polarity, false)?;
        self.lines
            .push(LineBinding {
                line,
                pin,
                polarity,
            })
            .map_err(|_| PlatformError::ResourceUnavailable)
    }

    /// Drive the beeper from a tone output instead of a pin
    ///
    /// The output's compare is set to half its period and it is toggled on
    /// and off with the `BUZZER` line.
    pub fn bind_buzzer(&mut self, mut tone: P) -> Result<()> {
        let half = tone.period() / 2;
        tone.set_compare(half)?;
        tone.disable();
        self.buzzer = Some(tone);
        Ok(())
    }

    /// Attach the periodic timer that raises strobe ticks
    pub fn bind_strobe_timer(&mut self, timer: T) {
        self.strobe_timer = Some(timer);
    }

    /// PWM output bound to `channel`
    pub fn pwm(&self, channel: PwmChannel) -> Option<&P> {
        self.pwm[channel.index()].as_ref()
    }

    /// Pin bound to `line`
    pub fn line(&self, line: DigitalLines) -> Option<&G> {
        self.lines.iter().find(|b| b.line == line).map(|b| &b.pin)
    }

    /// Tone output, if bound
    pub fn buzzer(&self) -> Option<&P> {
        self.buzzer.as_ref()
    }

    /// Strobe timer, if bound
    pub fn strobe_timer(&self) -> Option<&T> {
        self.strobe_timer.as_ref()
    }

    /// Mutable strobe timer, for the interrupt handler to acknowledge
    pub fn strobe_timer_mut(&mut self) -> Option<&mut T> {
        self.strobe_timer.as_mut()
    }

    /// Rate the strobe timer is currently programmed for
    pub fn strobe_rate(&self) -> Option<StrobeRate> {
        self.strobe_rate
    }

    /// Platform faults seen since power on
    pub fn faults(&self) -> u32 {
        self.faults
    }

    fn report(&mut self, result: Result<()>) {
        if let Err(error) = result {
            self.faults = self.faults.wrapping_add(1);
            if self.last_fault != Some(error) {
                crate::log_warn!("actuator fault #{}: {}", self.faults, error);
                self.last_fault = Some(error);
            }
        }
    }
}

impl<P, G, T> Default for PlatformActuators<P, G, T>
where
    P: PwmInterface,
    G: GpioInterface,
    T: TimerInterface,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<P, G, T> ActuatorSink for PlatformActuators<P, G, T>
where
    P: PwmInterface,
    G: GpioInterface,
    T: TimerInterface,
{
    fn set_pwm(&mut self, channel: PwmChannel, value: u16) {
        let result = match self.pwm[channel.index()].as_mut() {
            Some(output) => output.set_compare(value),
            None => Ok(()),
        };
        self.report(result);
    }

    fn set_digital(&mut self, line: DigitalLines, active: bool) {
        if line == DigitalLines::BUZZER {
            if let Some(tone) = self.buzzer.as_mut() {
                if active {
                    tone.enable();
                } else {
                    tone.disable();
                }
                return;
            }
        }

        let result = match self.lines.iter_mut().find(|b| b.line == line) {
            Some(binding) => binding.pin.set_active(binding.polarity, active),
            None => Ok(()),
        };
        self.report(result);
    }

    fn set_strobe_rate(&mut self, rate: StrobeRate) {
        if self.strobe_rate == Some(rate) {
            return;
        }
        let result = match self.strobe_timer.as_mut() {
            Some(timer) => timer.start_periodic(parameters::strobe_period_us(rate)),
            None => Ok(()),
        };
        if result.is_ok() {
            crate::log_debug!(
                "strobe period {} us",
                parameters::strobe_period_us(rate)
            );
            self.strobe_rate = Some(rate);
        }
        self.report(result);
    }
}
