//! Prelude module for common re-exports.
//!
//! Consumers can `use gale_common::prelude::*;` and get the most
//! important types without listing individual paths.

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, CoreConfig, InputMode, MotorConfig, ServoConfig};

// ─── Observations ───────────────────────────────────────────────────
pub use crate::observation::{JogDirection, Observation, SignLabel};

// ─── State ──────────────────────────────────────────────────────────
pub use crate::state::{FusionTier, SystemState};

// ─── Drivers ────────────────────────────────────────────────────────
pub use crate::driver::{AnalogInput, DriverError, MotorDriver, ServoDriver};
