//! Core firmware infrastructure
//!
//! Target-independent plumbing shared by the platform layer and the
//! machine: currently the logging macros.

pub mod logging;
