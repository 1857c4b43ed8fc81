//! GALE Common Library
//!
//! Shared types for the GALE gesture-controlled fan workspace:
//! configuration loading, the tagged classifier observation model,
//! the system state snapshot, and the actuator driver traits.
//!
//! # Module Structure
//!
//! - [`config`] - TOML configuration structs, defaults, and validation
//! - [`observation`] - Tagged classifier outputs and the sign alphabet
//! - [`state`] - The shared `SystemState` snapshot and telemetry enums
//! - [`driver`] - Hardware driver traits (motor, servo, analog input)
//! - [`prelude`] - Common re-exports for convenience

pub mod config;
pub mod driver;
pub mod observation;
pub mod prelude;
pub mod state;
