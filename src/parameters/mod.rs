//! Build-time parameters
//!
//! The firmware has no runtime configuration: the vehicle profile is chosen
//! by cargo feature and every tunable is a constant. Profile tables live in
//! [`rc_hydraulic_core::profile`]; this module holds link and board timing.

use rc_hydraulic_core::duplex;
use rc_hydraulic_core::mixing::StrobeRate;
use rc_hydraulic_core::VehicleProfile;

#[cfg(all(feature = "loader", feature = "excavator"))]
compile_error!("features `loader` and `excavator` are mutually exclusive");

#[cfg(not(any(feature = "loader", feature = "excavator")))]
compile_error!("enable exactly one vehicle feature: `loader` or `excavator`");

/// Profile built into this firmware image
#[cfg(all(feature = "loader", not(feature = "excavator")))]
pub const ACTIVE_PROFILE: &VehicleProfile = &rc_hydraulic_core::profile::LOADER;

/// Profile built into this firmware image
#[cfg(all(feature = "excavator", not(feature = "loader")))]
pub const ACTIVE_PROFILE: &VehicleProfile = &rc_hydraulic_core::profile::EXCAVATOR;

/// iBUS link rate
pub const SERIAL_BAUD: u32 = 115_200;

/// Half-duplex telemetry window opened after each servo frame
pub const TURNAROUND_WINDOW_US: u32 = duplex::TURNAROUND_WINDOW_US;

/// Watchdog window: 4096 * 8 * 64 cycles of the 48 MHz peripheral clock
pub const WATCHDOG_WINDOW_US: u32 = 43_690;

/// Indicator blink tick, about 3 Hz
pub const STROBE_NORMAL_US: u32 = 333_328;

/// Strobe pattern tick, about 24 Hz
pub const STROBE_FAST_US: u32 = 41_666;

/// H-bridge counter period; drive magnitudes 0..=500 map to 0..100 %
pub const BRIDGE_PERIOD: u16 = 500;

/// H-bridge switching frequency
pub const BRIDGE_PWM_HZ: u32 = 20_000;

/// Reverse beeper tone
pub const BUZZER_HZ: u32 = 1_318;

/// ADC sampling period for onboard sensors
pub const SENSOR_SAMPLE_US: u32 = 100_000;

/// Strobe timer period for a blink rate
pub const fn strobe_period_us(rate: StrobeRate) -> u32 {
    match rate {
        StrobeRate::Normal => STROBE_NORMAL_US,
        StrobeRate::Fast => STROBE_FAST_US,
    }
}
