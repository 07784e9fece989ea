//! End-to-end link cycles through the controller with mock hardware

use rc_hydraulic_core::controller::{Controller, Event};
use rc_hydraulic_core::duplex::{LinePhase, TURNAROUND_WINDOW_US};
use rc_hydraulic_core::ibus::{ChannelFrame, Checksum, Command, Request, SYNC};
use rc_hydraulic_core::profile::{VehicleProfile, EXCAVATOR, LOADER};
use rc_hydraulic_core::traits::mock::{CountingWatchdog, FixedSensors, MockClock, MockLine, RecordingSink};
use rc_hydraulic_core::traits::{DigitalLines, LineMode, PwmChannel};

/// Watchdog window of the target (4096 * 8 * 64 cycles at 48 MHz)
const WATCHDOG_US: u64 = 43_690;

/// Servo frame period of the receiver
const FRAME_PERIOD_US: u64 = 7_000;

type Harness<'a> = Controller<RecordingSink, FixedSensors, CountingWatchdog<'a>, MockLine>;

fn harness<'a>(profile: &'static VehicleProfile, clock: &'a MockClock) -> Harness<'a> {
    let mut controller = Controller::new(
        profile,
        RecordingSink::new(),
        FixedSensors::new([652, 1180, 0, 0]),
        CountingWatchdog::new(clock, WATCHDOG_US),
        MockLine::new(),
    );
    controller.start();
    controller
}

/// Feed bytes one at a time, checking the half-duplex invariant after each
fn feed(controller: &mut Harness<'_>, bytes: &[u8]) {
    for &byte in bytes {
        controller.handle(Event::ByteReceived(byte));
        assert_exclusive(controller);
    }
}

fn assert_exclusive(controller: &Harness<'_>) {
    let line = controller.line();
    assert!(
        !(line.receiver_enabled() && line.transmitter_enabled()),
        "receiver and transmitter enabled together"
    );
}

/// Clock out a pending reply and return the bytes seen on the wire
fn transmit(controller: &mut Harness<'_>) -> Vec<u8> {
    controller.line_mut().clear_written();
    while controller.phase() == LinePhase::Transmitting {
        controller.handle(Event::TransmitReady);
        assert_exclusive(controller);
    }
    assert!(controller.line().completion_requested());
    controller.handle(Event::TransmitComplete);
    assert_exclusive(controller);
    controller.line().written().to_vec()
}

fn reply_valid(bytes: &[u8]) -> bool {
    let (body, tail) = bytes.split_at(bytes.len() - 2);
    bytes[0] as usize == bytes.len() && Checksum::of(body) == u16::from_le_bytes([tail[0], tail[1]])
}

#[test]
fn centered_frame_settles_to_neutral() {
    let clock = MockClock::new();
    let mut controller = harness(&EXCAVATOR, &clock);
    let centered = ChannelFrame::uniform(1500).with(5, 1000).with(6, 1000).with(7, 1000);

    // Start from full deflection so the ramps have work to do
    let deflected = centered.with(2, 2000).with(0, 2000);
    feed(&mut controller, &deflected.encode());
    controller.handle(Event::RxTimeout);

    for _ in 0..100 {
        feed(&mut controller, &centered.encode());
        controller.handle(Event::RxTimeout);
    }

    let sink = controller.sink();
    for channel in [PwmChannel::Pump, PwmChannel::TrackLeft, PwmChannel::TrackRight] {
        assert_eq!(sink.pwm(channel), Some(1500), "{:?}", channel);
    }
    assert!(!sink.is_active(DigitalLines::PUMP_LOAD));
    assert!(!sink.is_active(DigitalLines::LIGHTS));
    assert_eq!(controller.channels(), &centered);
}

#[test]
fn all_channels_centered_reach_neutral_with_lights_on() {
    let clock = MockClock::new();
    let mut controller = harness(&EXCAVATOR, &clock);
    let centered = ChannelFrame::uniform(1500);

    feed(&mut controller, &centered.with(2, 2000).with(3, 1000).encode());
    controller.handle(Event::RxTimeout);
    for _ in 0..100 {
        feed(&mut controller, &centered.encode());
        controller.handle(Event::RxTimeout);
    }

    let sink = controller.sink();
    for channel in [
        PwmChannel::Pump,
        PwmChannel::TrackLeft,
        PwmChannel::TrackRight,
        PwmChannel::Auxiliary,
    ] {
        assert_eq!(sink.pwm(channel), Some(1500), "{:?}", channel);
    }
    assert!(!sink.is_active(DigitalLines::PUMP_LOAD));
    // A switch at mid travel counts as engaged
    assert!(sink.is_active(DigitalLines::LIGHTS));
    assert_eq!(controller.channels(), &centered);
}

#[test]
fn corrupted_checksum_changes_nothing() {
    let clock = MockClock::new();
    let mut controller = harness(&EXCAVATOR, &clock);
    let first = ChannelFrame::uniform(1500);
    feed(&mut controller, &first.encode());
    controller.handle(Event::RxTimeout);

    let writes_before = controller.sink().pwm_writes;
    let mut corrupted = ChannelFrame::uniform(1900).encode();
    corrupted[31] ^= 0x80;
    feed(&mut controller, &corrupted);

    assert_eq!(controller.channels(), &first);
    assert_eq!(controller.sink().pwm_writes, writes_before);
    assert_eq!(controller.watchdog().refreshes, 1);
    assert_eq!(controller.stats().servo_sync_losses, 1);
    assert_eq!(controller.phase(), LinePhase::ServoListening);
}

#[test]
fn telemetry_round_trip_in_one_window() {
    let clock = MockClock::new();
    let mut controller = harness(&LOADER, &clock);
    feed(&mut controller, &ChannelFrame::uniform(1500).encode());
    assert_eq!(controller.line_mut().take_armed(), Some(TURNAROUND_WINDOW_US));

    // Discovery
    let probe = Request::new(Command::Probe, 0).to_bytes();
    feed(&mut controller, &probe);
    assert_eq!(transmit(&mut controller), probe.to_vec());

    // Type of sensor 1 (external voltage, 2 bytes)
    feed(&mut controller, &Request::new(Command::TypeQuery, 1).to_bytes());
    let reply = transmit(&mut controller);
    assert_eq!(&reply[..4], &[6, 0x92, 0x03, 0x02]);
    assert!(reply_valid(&reply));

    // Value of sensor 1
    feed(&mut controller, &Request::new(Command::ValueQuery, 1).to_bytes());
    let reply = transmit(&mut controller);
    assert_eq!(u16::from_le_bytes([reply[2], reply[3]]), 1180);
    assert!(reply_valid(&reply));

    // Third sensor does not exist: no reply
    feed(&mut controller, &Request::new(Command::Probe, 2).to_bytes());
    assert_eq!(controller.phase(), LinePhase::TelemetryListening);

    controller.handle(Event::RxTimeout);
    assert_eq!(controller.line().mode(), LineMode::FullDuplex);

    let stats = controller.stats();
    assert_eq!(stats.telemetry_requests, 4);
    assert_eq!(stats.replies_sent, 3);
    assert_eq!(stats.sensor_drops, 1);
    assert_eq!(controller.line().violations, 0);
}

#[test]
fn malformed_request_silences_rest_of_window() {
    let clock = MockClock::new();
    let mut controller = harness(&LOADER, &clock);
    feed(&mut controller, &ChannelFrame::uniform(1500).encode());

    let mut bad = Request::new(Command::TypeQuery, 0).to_bytes();
    bad[3] ^= 0x01;
    feed(&mut controller, &bad);
    feed(&mut controller, &Request::new(Command::TypeQuery, 0).to_bytes());

    assert_eq!(controller.phase(), LinePhase::TelemetryListening);
    assert_eq!(controller.stats().telemetry_sync_losses, 1);
    assert_eq!(controller.stats().telemetry_requests, 0);

    // Next window starts clean
    controller.handle(Event::RxTimeout);
    feed(&mut controller, &ChannelFrame::uniform(1500).encode());
    feed(&mut controller, &Request::new(Command::TypeQuery, 0).to_bytes());
    assert_eq!(controller.phase(), LinePhase::Transmitting);
}

#[test]
fn half_duplex_never_overlaps_across_cycles() {
    let clock = MockClock::new();
    let mut controller = harness(&EXCAVATOR, &clock);

    for cycle in 0..20u16 {
        feed(&mut controller, &ChannelFrame::uniform(1400 + cycle * 10).encode());
        feed(&mut controller, &Request::new(Command::ValueQuery, 0).to_bytes());
        if cycle % 3 == 0 {
            // Timer fires mid-reply
            controller.handle(Event::TransmitReady);
        } else {
            transmit(&mut controller);
        }
        controller.handle(Event::RxTimeout);
        assert_exclusive(&controller);
        clock.advance(FRAME_PERIOD_US);
    }

    assert_eq!(controller.stats().servo_frames, 20);
    assert_eq!(controller.line().violations, 0);
    assert_eq!(controller.line().mode(), LineMode::FullDuplex);
}

#[test]
fn watchdog_starves_without_valid_frames() {
    let clock = MockClock::new();
    let mut controller = harness(&EXCAVATOR, &clock);

    for _ in 0..5 {
        feed(&mut controller, &ChannelFrame::uniform(1500).encode());
        controller.handle(Event::RxTimeout);
        clock.advance(FRAME_PERIOD_US);
        assert!(!controller.watchdog().expired());
    }
    let refreshes = controller.watchdog().refreshes;

    // Garbage and corrupted frames only
    let mut corrupted = ChannelFrame::uniform(1500).encode();
    corrupted[7] ^= 0x02;
    for _ in 0..8 {
        feed(&mut controller, &corrupted);
        feed(&mut controller, &[0x55, 0xAA, SYNC[0], 0x00]);
        clock.advance(FRAME_PERIOD_US);
    }

    assert_eq!(controller.watchdog().refreshes, refreshes);
    assert!(controller.watchdog().expired());
}
