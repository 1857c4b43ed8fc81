//! Top-level error type for core startup.
//!
//! Per-cycle hardware failures never surface here — the actuator
//! loops recover locally. Only startup problems (bad config, spawn
//! failure, unreachable actuator) are fatal.

use gale_common::config::ConfigError;
use gale_common::driver::DriverError;
use thiserror::Error;

/// Errors that can abort core startup.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration could not be loaded or validated.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Actuator hardware unavailable at startup.
    #[error("driver init: {0}")]
    Driver(#[from] DriverError),

    /// An actuator loop thread could not be spawned.
    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        name: &'static str,
        source: std::io::Error,
    },
}
