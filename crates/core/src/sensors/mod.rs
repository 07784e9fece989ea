//! Onboard sensors
//!
//! Each profile declares a small table of [`SensorDescriptor`]s. The table
//! order is the telemetry address order (index 0 answers address 1).
//! Raw 12-bit ADC samples are converted to iBUS units:
//!
//! - temperature: 0.1 °C with a +40 °C offset (400 = 0 °C)
//! - voltage: 0.01 V

use crate::traits::SensorSource;

/// iBUS sensor type: temperature
pub const TYPE_TEMPERATURE: u8 = 0x01;

/// iBUS sensor type: external voltage
pub const TYPE_EXTERNAL_VOLTAGE: u8 = 0x03;

/// Maximum sensors per profile
pub const MAX_SENSORS: usize = 4;

/// Factory calibration of the MCU's internal temperature sensor
///
/// Raw readings at 30 °C and 110 °C taken with a 3.3 V reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemperatureCalibration {
    pub cal30: u16,
    pub cal110: u16,
}

/// Raw sample to iBUS unit conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// MCU internal temperature sensor, scaled by the supply voltage
    InternalTemperature { vdda_mv: i32 },
    /// TMP36 analog sensor (10 mV/°C, 500 mV at 0 °C)
    Tmp36 { vdda_mv: i32 },
    /// Resistive divider; `scale` is full-scale input in 0.01 V
    VoltageDivider { scale: i32 },
}

impl Conversion {
    /// Convert a 12-bit ADC sample
    pub fn apply(&self, raw: u16, calibration: &TemperatureCalibration) -> i32 {
        let raw = raw as i32;
        match *self {
            Conversion::InternalTemperature { vdda_mv } => {
                let cal30 = calibration.cal30 as i32;
                let span = calibration.cal110 as i32 - cal30;
                ((raw * vdda_mv / 3300 - cal30) * 800)
                    .checked_div(span)
                    .map_or(0, |t| t + 700)
            }
            Conversion::Tmp36 { vdda_mv } => ((raw * vdda_mv) >> 12) - 500 + 400,
            Conversion::VoltageDivider { scale } => (raw * scale) >> 12,
        }
    }
}

/// One entry of a profile's sensor table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorDescriptor {
    /// iBUS sensor type code
    pub type_code: u8,
    /// Value width in bytes (2 or 4)
    pub width: u8,
    /// ADC input sampled for this sensor
    pub adc_channel: u8,
    /// Raw sample conversion
    pub conversion: Conversion,
}

impl SensorDescriptor {
    /// Word returned by a type query: type code in the low byte, width in
    /// the high byte
    pub const fn type_word(&self) -> u16 {
        self.type_code as u16 | (self.width as u16) << 8
    }
}

/// Latest raw sample per sensor, converted on demand
#[derive(Debug, Clone)]
pub struct SensorBank {
    table: &'static [SensorDescriptor],
    calibration: TemperatureCalibration,
    raw: [Option<u16>; MAX_SENSORS],
}

impl SensorBank {
    /// Create a bank for a sensor table
    pub const fn new(table: &'static [SensorDescriptor], calibration: TemperatureCalibration) -> Self {
        Self {
            table,
            calibration,
            raw: [None; MAX_SENSORS],
        }
    }

    /// Sensor table
    pub fn table(&self) -> &'static [SensorDescriptor] {
        self.table
    }

    /// Last raw sample for `index`
    pub fn raw(&self, index: usize) -> Option<u16> {
        self.raw.get(index).copied().flatten()
    }
}

impl SensorSource for SensorBank {
    /// Converted value, or 0 before the first sample
    fn value(&self, index: usize) -> i32 {
        match (self.table.get(index), self.raw(index)) {
            (Some(descriptor), Some(raw)) => descriptor.conversion.apply(raw, &self.calibration),
            _ => 0,
        }
    }

    fn record(&mut self, index: usize, raw: u16) {
        if index < self.table.len() {
            if let Some(slot) = self.raw.get_mut(index) {
                *slot = Some(raw);
            }
        }
    }
}

/// Temperature-controlled fan configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanConfig {
    /// Temperature sensor index
    pub sensor: usize,
    /// Switch on above this value (iBUS units)
    pub on_above: i32,
    /// Switch off below this value (iBUS units)
    pub off_below: i32,
}

/// Fan hysteresis state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanControl {
    on: bool,
}

impl FanControl {
    /// Fan starts off
    pub const fn new() -> Self {
        Self { on: false }
    }

    /// Feed a temperature reading and return the fan state
    pub fn update(&mut self, config: &FanConfig, temperature: i32) -> bool {
        if temperature > config.on_above {
            self.on = true;
        } else if temperature < config.off_below {
            self.on = false;
        }
        self.on
    }

    /// Current fan state
    pub fn is_on(&self) -> bool {
        self.on
    }
}
