//! rc_hydraulic_core - Pure no_std control logic for hydraulic RC models
//!
//! This crate contains the platform-agnostic half of the firmware: the iBUS
//! serial protocol state machines, the sensor telemetry responder, the
//! half-duplex line arbiter and the control mixing engine. Everything here can
//! be tested on the host without feature flags or hardware.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives allowed
//! - **Pure no_std**: No std library dependencies
//! - **Trait abstractions**: Hardware services injected via traits
//!
//! # Modules
//!
//! - [`traits`]: Hardware seams (actuator sink, sensor source, watchdog, serial line)
//! - [`ibus`]: Servo frame receiver, telemetry request parser and reply framing
//! - [`duplex`]: Half-duplex line arbitration (servo listening vs telemetry)
//! - [`mixing`]: Input normalization, output shaping, ramping and discrete outputs
//! - [`profile`]: Loader and excavator parameter tables
//! - [`sensors`]: Sensor descriptors, ADC conversions and fan hysteresis
//! - [`controller`]: Event enum and the run-to-completion controller

#![no_std]

pub mod controller;
pub mod duplex;
pub mod ibus;
pub mod mixing;
pub mod profile;
pub mod sensors;
pub mod traits;

pub use controller::{Controller, Event, ReceiverStats};
pub use profile::VehicleProfile;
