#![cfg_attr(not(test), no_std)]

//! rc_hydraulic - iBUS receiver firmware for hydraulic RC models
//!
//! Decodes servo frames from a FlySky iBUS receiver, mixes them into valve,
//! pump and track outputs for a wheel loader or an excavator, and answers
//! the receiver's sensor telemetry requests on the same wire.
//!
//! The protocol, mixing and control logic live in the platform-agnostic
//! `rc_hydraulic_core` crate; this crate binds it to hardware through the
//! platform abstraction layer.

// Logging macros
pub mod core;

// Platform abstraction layer
pub mod platform;

// Adapters from controller traits to platform peripherals
pub mod libraries;

// Build-time configuration
pub mod parameters;

// Event dispatch and runtime glue
pub mod machine;

pub use rc_hydraulic_core as control;
