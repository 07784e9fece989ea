use super::{DriveOutput, SelectorConfig, ValveAxis, VehicleProfile};
use crate::mixing::{DriveCurve, PumpCurve, ValveCurve};
use crate::sensors::{Conversion, FanConfig, SensorDescriptor, TYPE_EXTERNAL_VOLTAGE, TYPE_TEMPERATURE};
use crate::traits::PwmChannel;

const SENSORS: [SensorDescriptor; 2] = [
    SensorDescriptor {
        type_code: TYPE_TEMPERATURE,
        width: 2,
        adc_channel: 0,
        conversion: Conversion::Tmp36 { vdda_mv: 3316 },
    },
    SensorDescriptor {
        type_code: TYPE_EXTERNAL_VOLTAGE,
        width: 2,
        adc_channel: 1,
        conversion: Conversion::VoltageDivider { scale: 3640 },
    },
];

/// Tracked excavator: servo valves, ESC track drive, selector and fan
///
/// Switches: 0 lights, 1 selector high, 2 selector low.
pub const EXCAVATOR: VehicleProfile = VehicleProfile {
    name: "excavator",
    switch_channels: &[5, 6, 7],
    valves: [
        // Bucket
        ValveAxis {
            channel: 0,
            trim: 0,
            output: Some(PwmChannel::Valve1),
        },
        // Boom
        ValveAxis {
            channel: 1,
            trim: 95,
            output: Some(PwmChannel::Valve2),
        },
        // Stick
        ValveAxis {
            channel: 4,
            trim: 115,
            output: Some(PwmChannel::Valve3),
        },
    ],
    valve_curve: ValveCurve {
        closed: 200,
        breakpoint: Some(300),
        gain: 150,
    },
    throttle_channel: 2,
    steering_channel: 3,
    pump: PumpCurve {
        min: 150,
        max: 500,
        limit: 20,
    },
    drive: DriveCurve {
        min: 50,
        max: 500,
        limit: 10,
    },
    drive_output: DriveOutput::Servo,
    selector: Some(SelectorConfig {
        raise_switch: 1,
        lower_switch: 2,
    }),
    auxiliary: true,
    lights_switch: 0,
    reverse_lamp: false,
    pump_load_line: true,
    indicators: None,
    reverse_buzzer: false,
    // 30.0 °C on, 25.0 °C off
    fan: Some(FanConfig {
        sensor: 0,
        on_above: 700,
        off_below: 650,
    }),
    sensors: &SENSORS,
};
