//! Run-to-completion controller
//!
//! [`Controller`] owns every piece of mutable protocol and mixing state and
//! is driven by [`Event`]s, one at a time. Each event stands for one
//! hardware interrupt:
//!
//! | Event              | Source                                  |
//! |--------------------|-----------------------------------------|
//! | `ByteReceived`     | UART receive register not empty         |
//! | `TransmitReady`    | UART transmit register empty            |
//! | `TransmitComplete` | UART transmission complete              |
//! | `RxTimeout`        | turnaround one-shot timer               |
//! | `StrobeTick`       | indicator strobe timer                  |
//! | `SensorSample`     | ADC conversion complete                 |
//!
//! Handlers never block and never re-enter; the platform layer serializes
//! events (see the root crate's `machine` module).

use crate::duplex::{HalfDuplexArbiter, LinePhase, TURNAROUND_WINDOW_US};
use crate::ibus::{
    self, ChannelFrame, RequestParser, SensorDrop, ServoReceiver, SyncError, TransmitBuffer,
};
use crate::mixing::MixingEngine;
use crate::profile::VehicleProfile;
use crate::traits::{ActuatorSink, SensorSource, SerialLine, Watchdog};

/// Hardware events delivered to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// One byte received on the UART
    ByteReceived(u8),
    /// Transmit data register can take the next byte
    TransmitReady,
    /// Final byte has left the wire
    TransmitComplete,
    /// Telemetry window expired
    RxTimeout,
    /// Indicator strobe timer period elapsed
    StrobeTick,
    /// Fresh ADC sample for sensor `index`
    SensorSample { index: u8, raw: u16 },
}

/// Link counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReceiverStats {
    /// Checksum-valid servo frames
    pub servo_frames: u32,
    /// Servo frames discarded
    pub servo_sync_losses: u32,
    /// Checksum-valid sensor requests
    pub telemetry_requests: u32,
    /// Malformed sensor requests
    pub telemetry_sync_losses: u32,
    /// Valid requests that produced no reply
    pub sensor_drops: u32,
    /// Replies fully transmitted
    pub replies_sent: u32,
    /// Telemetry windows closed by the turnaround timer
    pub turnarounds: u32,
}

/// Protocol receiver, telemetry responder, arbiter and mixer in one owner
pub struct Controller<S, Q, W, L> {
    profile: &'static VehicleProfile,
    sink: S,
    sensors: Q,
    watchdog: W,
    line: L,
    servo: ServoReceiver,
    requests: RequestParser,
    tx: TransmitBuffer,
    arbiter: HalfDuplexArbiter,
    channels: ChannelFrame,
    engine: MixingEngine,
    stats: ReceiverStats,
    last_sync_error: Option<SyncError>,
    last_drop: Option<SensorDrop>,
}

impl<S, Q, W, L> Controller<S, Q, W, L>
where
    S: ActuatorSink,
    Q: SensorSource,
    W: Watchdog,
    L: SerialLine,
{
    /// Assemble a controller; call [`Controller::start`] before feeding events
    pub fn new(profile: &'static VehicleProfile, sink: S, sensors: Q, watchdog: W, line: L) -> Self {
        Self {
            profile,
            sink,
            sensors,
            watchdog,
            line,
            servo: ServoReceiver::new(),
            requests: RequestParser::new(),
            tx: TransmitBuffer::new(),
            arbiter: HalfDuplexArbiter::new(TURNAROUND_WINDOW_US),
            channels: ChannelFrame::default(),
            engine: MixingEngine::new(profile),
            stats: ReceiverStats::default(),
            last_sync_error: None,
            last_drop: None,
        }
    }

    /// Drive every output to its idle state, then open the line for servo
    /// frames
    pub fn start(&mut self) {
        self.engine.idle_command().write_to(&mut self.sink);
        self.arbiter.power_on(&mut self.line);
    }

    /// Process one event to completion
    pub fn handle(&mut self, event: Event) {
        match event {
            Event::ByteReceived(byte) => self.on_byte(byte),
            Event::TransmitReady => self.on_transmit_ready(),
            Event::TransmitComplete => {
                if self.arbiter.transmit_complete(&mut self.line) {
                    self.stats.replies_sent = self.stats.replies_sent.wrapping_add(1);
                }
            }
            Event::RxTimeout => self.on_timeout(),
            Event::StrobeTick => self.engine.strobe_tick().write_to(&mut self.sink),
            Event::SensorSample { index, raw } => self.sensors.record(index as usize, raw),
        }
    }

    fn on_byte(&mut self, byte: u8) {
        match self.arbiter.phase() {
            LinePhase::ServoListening => match self.servo.push(byte) {
                Some(Ok(frame)) => self.on_servo_frame(frame),
                Some(Err(error)) => {
                    self.stats.servo_sync_losses = self.stats.servo_sync_losses.wrapping_add(1);
                    self.last_sync_error = Some(error);
                }
                None => {}
            },
            LinePhase::TelemetryListening => match self.requests.push(byte) {
                Some(Ok(request)) => {
                    self.stats.telemetry_requests = self.stats.telemetry_requests.wrapping_add(1);
                    match ibus::reply(&request, self.profile.sensors, &self.sensors) {
                        Ok(reply) => {
                            if self.tx.load(&reply).is_ok() {
                                self.arbiter.begin_transmit(&mut self.line);
                            }
                        }
                        Err(drop) => {
                            self.stats.sensor_drops = self.stats.sensor_drops.wrapping_add(1);
                            self.last_drop = Some(drop);
                        }
                    }
                }
                Some(Err(error)) => {
                    self.stats.telemetry_sync_losses = self.stats.telemetry_sync_losses.wrapping_add(1);
                    self.last_sync_error = Some(error);
                }
                None => {}
            },
            // Receiver is off while replying
            LinePhase::Transmitting | LinePhase::Draining => {}
        }
    }

    fn on_servo_frame(&mut self, frame: ChannelFrame) {
        self.channels = frame;
        self.stats.servo_frames = self.stats.servo_frames.wrapping_add(1);

        let command = self.engine.mix(&self.channels, &self.sensors);
        command.write_to(&mut self.sink);
        self.watchdog.refresh();

        self.requests.reset();
        self.arbiter.open_telemetry_window(&mut self.line);
    }

    fn on_transmit_ready(&mut self) {
        if self.arbiter.phase() != LinePhase::Transmitting {
            return;
        }
        if let Some(byte) = self.tx.next_byte() {
            self.line.write_byte(byte);
        }
        if self.tx.is_finished() {
            self.arbiter.last_byte_written(&mut self.line);
        }
    }

    fn on_timeout(&mut self) {
        self.arbiter.timeout(&mut self.line);
        self.tx.abort();
        self.servo.reset();
        self.requests.reset();
        self.stats.turnarounds = self.stats.turnarounds.wrapping_add(1);
    }

    /// Active profile
    pub fn profile(&self) -> &'static VehicleProfile {
        self.profile
    }

    /// Last accepted channel frame
    pub fn channels(&self) -> &ChannelFrame {
        &self.channels
    }

    /// Current line phase
    pub fn phase(&self) -> LinePhase {
        self.arbiter.phase()
    }

    /// Link counters
    pub fn stats(&self) -> ReceiverStats {
        self.stats
    }

    /// Most recent framing failure
    pub fn last_sync_error(&self) -> Option<SyncError> {
        self.last_sync_error
    }

    /// Most recent dropped sensor request
    pub fn last_drop(&self) -> Option<SensorDrop> {
        self.last_drop
    }

    /// Mixing engine state
    pub fn engine(&self) -> &MixingEngine {
        &self.engine
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn sensors(&self) -> &Q {
        &self.sensors
    }

    pub fn watchdog(&self) -> &W {
        &self.watchdog
    }

    pub fn line(&self) -> &L {
        &self.line
    }

    pub fn line_mut(&mut self) -> &mut L {
        &mut self.line
    }
}
