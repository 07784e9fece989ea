use super::{DriveOutput, IndicatorConfig, ValveAxis, VehicleProfile};
use crate::mixing::{DriveCurve, PumpCurve, ValveCurve};
use crate::sensors::{Conversion, SensorDescriptor, TYPE_EXTERNAL_VOLTAGE, TYPE_TEMPERATURE};

const SENSORS: [SensorDescriptor; 2] = [
    SensorDescriptor {
        type_code: TYPE_TEMPERATURE,
        width: 2,
        adc_channel: 16,
        conversion: Conversion::InternalTemperature { vdda_mv: 3336 },
    },
    SensorDescriptor {
        type_code: TYPE_EXTERNAL_VOLTAGE,
        width: 2,
        adc_channel: 0,
        conversion: Conversion::VoltageDivider { scale: 3720 },
    },
];

/// Wheel loader: H-bridge wheel drive, indicators and reverse beeper
///
/// Switches: 0 lights, 1 hazard/strobe.
pub const LOADER: VehicleProfile = VehicleProfile {
    name: "loader",
    switch_channels: &[5, 6],
    valves: [
        // Bucket
        ValveAxis {
            channel: 0,
            trim: 0,
            output: None,
        },
        // Lift arm
        ValveAxis {
            channel: 1,
            trim: 0,
            output: None,
        },
        // Ripper
        ValveAxis {
            channel: 4,
            trim: 0,
            output: None,
        },
    ],
    valve_curve: ValveCurve {
        closed: 80,
        breakpoint: None,
        gain: 60,
    },
    throttle_channel: 2,
    steering_channel: 3,
    pump: PumpCurve {
        min: 100,
        max: 260,
        limit: 20,
    },
    drive: DriveCurve {
        min: 50,
        max: 500,
        limit: 20,
    },
    drive_output: DriveOutput::HBridge,
    selector: None,
    auxiliary: false,
    lights_switch: 0,
    reverse_lamp: true,
    pump_load_line: false,
    indicators: Some(IndicatorConfig { hazard_switch: 1 }),
    reverse_buzzer: true,
    fan: None,
    sensors: &SENSORS,
};
