//! Firmware machine: the controller bound to a platform
//!
//! [`Machine`] claims every peripheral the active profile needs, wraps them
//! in the library adapters and hands them to the core [`Controller`].
//! Interrupt handlers translate hardware events into [`Event`]s on an
//! [`EventQueue`]; the main loop drains the queue with
//! [`Machine::run_pending`], processing each event to completion.
//!
//! ```text
//!  UART RX/TX ISR ──┐
//!  turnaround timer ├──► EventQueue ──► Machine::run_pending ──► Controller
//!  strobe timer ────┤
//!  sensor sampling ─┘
//! ```

pub mod board;
pub mod queue;

#[cfg(feature = "embassy")]
pub mod task;

pub use board::{BoardPins, LinePin, EXCAVATOR_BOARD, LOADER_BOARD};
pub use queue::{EventQueue, EVENTS, EVENT_CAPACITY};

use rc_hydraulic_core::profile::DriveOutput;
use rc_hydraulic_core::sensors::SensorBank;
use rc_hydraulic_core::traits::PwmChannel;
use rc_hydraulic_core::{Controller, Event, ReceiverStats, VehicleProfile};

use crate::libraries::{HardwareWatchdog, PlatformActuators, PlatformLine};
use crate::parameters;
use crate::platform::traits::{AdcInterface, Platform, PwmConfig, UartConfig};
use crate::platform::{PlatformError, Result};

/// Controller over the adapters of platform `P`
pub type PlatformController<P> = Controller<
    PlatformActuators<<P as Platform>::Pwm, <P as Platform>::Gpio, <P as Platform>::Timer>,
    SensorBank,
    HardwareWatchdog<<P as Platform>::Watchdog>,
    PlatformLine<<P as Platform>::Uart, <P as Platform>::Timer>,
>;

/// Controller, ADC and link bookkeeping for one board
pub struct Machine<P: Platform> {
    controller: PlatformController<P>,
    adc: P::Adc,
    reported: ReceiverStats,
}

impl<P: Platform> Machine<P> {
    /// Claim peripherals from `platform` for `profile` wired as `board`
    ///
    /// Only channels and lines the profile drives are claimed. The watchdog
    /// is armed last, so a failure anywhere before leaves it stopped.
    ///
    /// # Errors
    ///
    /// Propagates the first platform error while claiming or configuring a
    /// peripheral, or `ResourceUnavailable` if the board lacks a pin the
    /// profile needs.
    pub fn new(
        platform: &mut P,
        profile: &'static VehicleProfile,
        board: &BoardPins,
    ) -> Result<Self> {
        let uart = platform.create_uart(
            board.uart,
            UartConfig {
                baud_rate: parameters::SERIAL_BAUD,
            },
        )?;
        let turnaround = platform.create_timer(board.turnaround_timer)?;
        let line = PlatformLine::new(uart, turnaround);

        let mut actuators = PlatformActuators::new();
        for channel in profile.pwm_channels() {
            let pin = board
                .pwm_pin(channel)
                .ok_or(PlatformError::ResourceUnavailable)?;
            let config = pwm_config(profile, board, channel);
            actuators.bind_pwm(channel, platform.create_pwm(pin, config)?);
        }
        let lines = profile.digital_lines();
        for wiring in board.lines.iter().filter(|w| lines.contains(w.line)) {
            let pin = platform.create_gpio(wiring.pin)?;
            actuators.bind_line(wiring.line, pin, wiring.polarity)?;
        }
        if profile.reverse_buzzer {
            if let Some(pin) = board.buzzer {
                let tone = PwmConfig::tone(platform.system_clock_hz(), parameters::BUZZER_HZ);
                actuators.bind_buzzer(platform.create_pwm(pin, tone)?)?;
            }
        }
        if profile.uses_strobe() {
            actuators.bind_strobe_timer(platform.create_timer(board.strobe_timer)?);
        }

        let adc = platform.create_adc()?;
        let sensors = SensorBank::new(profile.sensors, adc.temperature_calibration());

        let watchdog =
            HardwareWatchdog::start(platform.create_watchdog()?, parameters::WATCHDOG_WINDOW_US)?;

        Ok(Self {
            controller: Controller::new(profile, actuators, sensors, watchdog, line),
            adc,
            reported: ReceiverStats::default(),
        })
    }

    /// Drive outputs to idle and open the line for servo frames
    pub fn start(&mut self) {
        self.controller.start();
        crate::log_info!(
            "{} profile started, {} baud",
            self.controller.profile().name,
            parameters::SERIAL_BAUD
        );
    }

    /// Process one event to completion
    pub fn dispatch(&mut self, event: Event) {
        self.controller.handle(event);
        self.report();
    }

    /// Drain `queue`, returning the number of events processed
    pub fn run_pending<const N: usize>(&mut self, queue: &EventQueue<N>) -> usize {
        let dropped = queue.take_dropped();
        if dropped > 0 {
            crate::log_warn!("event queue overflow, {} events lost", dropped);
        }

        let mut processed = 0;
        while let Some(event) = queue.pop() {
            self.dispatch(event);
            processed += 1;
        }
        processed
    }

    /// Convert every profile sensor once and feed the samples in
    pub fn sample_sensors(&mut self) {
        let table = self.controller.profile().sensors;
        for (index, sensor) in table.iter().enumerate() {
            match self.adc.read(sensor.adc_channel) {
                Ok(raw) => self.dispatch(Event::SensorSample {
                    index: index as u8,
                    raw,
                }),
                Err(error) => {
                    crate::log_warn!("sensor {} not sampled: {}", index, error)
                }
            }
        }
    }

    /// Underlying controller
    pub fn controller(&self) -> &PlatformController<P> {
        &self.controller
    }

    /// Underlying controller, mutable
    pub fn controller_mut(&mut self) -> &mut PlatformController<P> {
        &mut self.controller
    }

    /// ADC used for sensor sampling
    pub fn adc_mut(&mut self) -> &mut P::Adc {
        &mut self.adc
    }

    /// Log counters that moved since the last event
    fn report(&mut self) {
        let stats = self.controller.stats();
        let last = self.reported;
        if stats == last {
            return;
        }

        if last.servo_frames == 0 && stats.servo_frames > 0 {
            crate::log_info!("servo link up");
        }
        if stats.servo_sync_losses != last.servo_sync_losses {
            crate::log_debug!("servo sync lost ({} total)", stats.servo_sync_losses);
        }
        if stats.telemetry_sync_losses != last.telemetry_sync_losses {
            crate::log_debug!(
                "telemetry sync lost ({} total)",
                stats.telemetry_sync_losses
            );
        }
        if stats.sensor_drops != last.sensor_drops {
            crate::log_trace!("sensor request dropped ({} total)", stats.sensor_drops);
        }
        self.reported = stats;
    }
}

/// PWM configuration for a profile channel
fn pwm_config(profile: &VehicleProfile, board: &BoardPins, channel: PwmChannel) -> PwmConfig {
    match (channel, profile.drive_output) {
        (PwmChannel::TrackLeft | PwmChannel::TrackRight, DriveOutput::HBridge) => {
            PwmConfig::bridge(
                parameters::BRIDGE_PWM_HZ * parameters::BRIDGE_PERIOD as u32,
                parameters::BRIDGE_PERIOD,
            )
        }
        _ => PwmConfig::servo(board.servo_period_us(channel)),
    }
}
