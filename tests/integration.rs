//! Machine-level tests on the mock platform
//!
//! Interrupts are simulated by advancing the mock timers and pushing the
//! resulting events onto a queue, which the machine drains like the main
//! loop does on the target.

#![cfg(feature = "mock")]

use rc_hydraulic::control::duplex::LinePhase;
use rc_hydraulic::control::ibus::{ChannelFrame, Checksum, Command, Request};
use rc_hydraulic::control::profile::{VehicleProfile, EXCAVATOR, LOADER};
use rc_hydraulic::control::traits::{DigitalLines, PwmChannel};
use rc_hydraulic::control::Event;
use rc_hydraulic::machine::{BoardPins, EventQueue, Machine, EXCAVATOR_BOARD, LOADER_BOARD};
use rc_hydraulic::parameters;
use rc_hydraulic::platform::mock::MockPlatform;
use rc_hydraulic::platform::traits::{GpioInterface, PwmInterface};

struct Rig {
    machine: Machine<MockPlatform>,
    queue: EventQueue<64>,
}

impl Rig {
    fn new(profile: &'static VehicleProfile, board: &BoardPins) -> Self {
        let mut platform = MockPlatform::new();
        let mut machine = Machine::new(&mut platform, profile, board).unwrap();
        machine.start();
        Self {
            machine,
            queue: EventQueue::new(),
        }
    }

    fn receive(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.queue.push(Event::ByteReceived(byte));
        }
        self.machine.run_pending(&self.queue);
    }

    /// One servo frame followed by an idle telemetry window
    fn cycle(&mut self, frame: &ChannelFrame) {
        self.receive(&frame.encode());
        self.elapse_turnaround(parameters::TURNAROUND_WINDOW_US);
    }

    fn elapse_turnaround(&mut self, us: u32) {
        let fired = self
            .machine
            .controller_mut()
            .line_mut()
            .turnaround_mut()
            .advance(us);
        for _ in 0..fired {
            self.queue.push(Event::RxTimeout);
        }
        self.machine.run_pending(&self.queue);
    }

    fn elapse_strobe(&mut self, us: u32) {
        let fired = self
            .machine
            .controller_mut()
            .sink_mut()
            .strobe_timer_mut()
            .map_or(0, |timer| timer.advance(us));
        for _ in 0..fired {
            self.queue.push(Event::StrobeTick);
        }
        self.machine.run_pending(&self.queue);
    }

    /// Clock out the pending reply like the UART interrupts would
    fn transmit(&mut self) -> Vec<u8> {
        self.machine
            .controller_mut()
            .line_mut()
            .uart_mut()
            .clear_tx_buffer();
        while self.machine.controller().phase() == LinePhase::Transmitting {
            self.queue.push(Event::TransmitReady);
            self.machine.run_pending(&self.queue);
        }
        assert!(self
            .machine
            .controller()
            .line()
            .uart()
            .is_listening_transmit_complete());
        self.queue.push(Event::TransmitComplete);
        self.machine.run_pending(&self.queue);
        self.machine.controller().line().uart().tx_buffer().to_vec()
    }

    fn line_high(&self, line: DigitalLines) -> bool {
        self.machine
            .controller()
            .sink()
            .line(line)
            .map(|pin| pin.is_set_high())
            .unwrap_or(false)
    }

    fn compare(&self, channel: PwmChannel) -> u16 {
        self.machine
            .controller()
            .sink()
            .pwm(channel)
            .map_or(0, |pwm| pwm.compare())
    }
}

fn loader_frame(throttle: u16, steering: u16) -> ChannelFrame {
    ChannelFrame::uniform(1500)
        .with(2, throttle)
        .with(3, steering)
        .with(5, 1000)
        .with(6, 1000)
}

fn excavator_frame() -> ChannelFrame {
    ChannelFrame::uniform(1500)
        .with(5, 1000)
        .with(6, 1000)
        .with(7, 1000)
}

#[test]
fn loader_powers_up_safe() {
    let rig = Rig::new(&LOADER, &LOADER_BOARD);

    assert_eq!(rig.compare(PwmChannel::Pump), 1500);
    assert_eq!(rig.compare(PwmChannel::TrackLeft), 0);
    assert_eq!(rig.compare(PwmChannel::TrackRight), 0);
    // Reverse lamp is active low: idle means high
    assert!(rig.line_high(DigitalLines::REVERSE_LAMP));
    assert!(!rig.line_high(DigitalLines::LEFT_FORWARD));
    assert!(!rig.line_high(DigitalLines::LIGHTS));

    let sink = rig.machine.controller().sink();
    assert!(!sink.buzzer().unwrap().is_enabled());
    assert_eq!(
        sink.strobe_timer().unwrap().period_us(),
        Some(parameters::STROBE_NORMAL_US)
    );

    let uart = rig.machine.controller().line().uart();
    assert!(uart.receiver_enabled());
    assert!(!uart.transmitter_enabled());
    assert!(!uart.is_half_duplex());
}

#[test]
fn loader_reversing_drives_bridge_lamp_and_beeper() {
    let mut rig = Rig::new(&LOADER, &LOADER_BOARD);
    for _ in 0..30 {
        rig.cycle(&loader_frame(1200, 1500));
    }

    assert_eq!(rig.compare(PwmChannel::TrackLeft), 300);
    assert_eq!(rig.compare(PwmChannel::TrackRight), 300);
    assert!(rig.line_high(DigitalLines::LEFT_REVERSE));
    assert!(!rig.line_high(DigitalLines::LEFT_FORWARD));
    assert!(rig.line_high(DigitalLines::RIGHT_REVERSE));
    assert!(!rig.line_high(DigitalLines::REVERSE_LAMP));

    // Beeper alternates on each blink tick
    rig.elapse_strobe(parameters::STROBE_NORMAL_US);
    assert!(rig.machine.controller().sink().buzzer().unwrap().is_enabled());
    rig.elapse_strobe(parameters::STROBE_NORMAL_US);
    assert!(!rig.machine.controller().sink().buzzer().unwrap().is_enabled());

    // Stopping silences it
    for _ in 0..30 {
        rig.cycle(&loader_frame(1500, 1500));
    }
    rig.elapse_strobe(parameters::STROBE_NORMAL_US);
    assert!(!rig.machine.controller().sink().buzzer().unwrap().is_enabled());
    assert!(rig.line_high(DigitalLines::REVERSE_LAMP));
    assert_eq!(rig.compare(PwmChannel::TrackLeft), 0);
}

#[test]
fn loader_strobe_switch_speeds_up_timer() {
    let mut rig = Rig::new(&LOADER, &LOADER_BOARD);
    rig.cycle(&loader_frame(1500, 1500).with(6, 2000));

    let timer = rig.machine.controller().sink().strobe_timer().unwrap();
    assert_eq!(timer.period_us(), Some(parameters::STROBE_FAST_US));

    // Eight fast ticks make one pattern step
    rig.elapse_strobe(parameters::STROBE_FAST_US * 8);
    let left = rig.line_high(DigitalLines::INDICATOR_LEFT);
    let right = rig.line_high(DigitalLines::INDICATOR_RIGHT);
    assert!(left != right);
}

#[test]
fn loader_telemetry_over_uart() {
    let mut rig = Rig::new(&LOADER, &LOADER_BOARD);
    rig.machine.adc_mut().set_sample(0, 1_000);
    rig.machine.adc_mut().set_sample(16, 1_720);
    rig.machine.sample_sensors();

    rig.receive(&loader_frame(1500, 1500).encode());
    assert!(rig.machine.controller().line().uart().is_half_duplex());

    rig.receive(&Request::new(Command::TypeQuery, 0).to_bytes());
    let reply = rig.transmit();
    assert_eq!(reply.len(), 6);
    assert_eq!(reply[1], Request::new(Command::TypeQuery, 0).command_byte());
    assert_eq!(&reply[2..4], &[0x01, 0x02]);

    rig.receive(&Request::new(Command::ValueQuery, 1).to_bytes());
    let reply = rig.transmit();
    // (1000 * 3720) >> 12
    assert_eq!(u16::from_le_bytes([reply[2], reply[3]]), 908);
    let (body, tail) = reply.split_at(reply.len() - 2);
    assert_eq!(Checksum::of(body), u16::from_le_bytes([tail[0], tail[1]]));

    rig.elapse_turnaround(parameters::TURNAROUND_WINDOW_US);
    let uart = rig.machine.controller().line().uart();
    assert!(!uart.is_half_duplex());
    assert!(uart.receiver_enabled());
    assert_eq!(uart.overlaps, 0);

    let stats = rig.machine.controller().stats();
    assert_eq!(stats.replies_sent, 2);
    assert_eq!(stats.turnarounds, 1);
}

#[test]
fn excavator_fan_follows_temperature() {
    let mut rig = Rig::new(&EXCAVATOR, &EXCAVATOR_BOARD);
    rig.machine.adc_mut().set_sample(1, 1_000);

    // TMP36: (1300 * 3316) >> 12 = 1052 mV, 55.2 °C
    rig.machine.adc_mut().set_sample(0, 1_300);
    rig.machine.sample_sensors();
    rig.cycle(&excavator_frame());
    assert!(rig.line_high(DigitalLines::FAN));

    // 25.2 °C sits inside the hysteresis band
    rig.machine.adc_mut().set_sample(0, 930);
    rig.machine.sample_sensors();
    rig.cycle(&excavator_frame());
    assert!(rig.line_high(DigitalLines::FAN));

    // 17.5 °C
    rig.machine.adc_mut().set_sample(0, 835);
    rig.machine.sample_sensors();
    rig.cycle(&excavator_frame());
    assert!(!rig.line_high(DigitalLines::FAN));
}

#[test]
fn excavator_valve_demand_loads_pump() {
    let mut rig = Rig::new(&EXCAVATOR, &EXCAVATOR_BOARD);
    rig.cycle(&excavator_frame());
    assert!(rig.line_high(DigitalLines::PUMP_LOAD));
    assert_eq!(rig.compare(PwmChannel::Pump), 1500);

    for _ in 0..50 {
        rig.cycle(&excavator_frame().with(0, 2000));
    }
    assert!(rig.compare(PwmChannel::Pump) > 1500);
    // Active low solenoid driver
    assert!(!rig.line_high(DigitalLines::PUMP_LOAD));
    assert_eq!(rig.compare(PwmChannel::Valve1), 2000);
    assert_eq!(rig.compare(PwmChannel::Selector), 1500);
}

#[test]
fn corrupted_frames_starve_watchdog() {
    let mut rig = Rig::new(&EXCAVATOR, &EXCAVATOR_BOARD);
    for _ in 0..3 {
        rig.cycle(&excavator_frame());
    }
    let feeds = rig.machine.controller().watchdog().inner().feeds;
    assert_eq!(feeds, 3);

    let mut corrupted = excavator_frame().with(0, 1900).encode();
    corrupted[30] ^= 0x01;
    for _ in 0..5 {
        rig.receive(&corrupted);
    }

    assert_eq!(rig.machine.controller().watchdog().inner().feeds, feeds);
    assert_eq!(rig.compare(PwmChannel::Valve1), 1500);
    assert_eq!(rig.machine.controller().stats().servo_sync_losses, 5);
}

#[test]
fn queue_overflow_is_counted_not_fatal() {
    let mut platform = MockPlatform::new();
    let mut machine = Machine::new(&mut platform, &EXCAVATOR, &EXCAVATOR_BOARD).unwrap();
    machine.start();
    let queue: EventQueue<16> = EventQueue::new();

    for byte in excavator_frame().encode() {
        queue.push(Event::ByteReceived(byte));
    }
    assert_eq!(machine.run_pending(&queue), 16);
    assert_eq!(queue.take_dropped(), 0);
    assert_eq!(machine.controller().stats().servo_frames, 0);

    // The truncated frame does not block the next one
    for byte in excavator_frame().encode() {
        queue.push(Event::ByteReceived(byte));
        machine.run_pending(&queue);
    }
    assert_eq!(machine.controller().stats().servo_frames, 1);
}
