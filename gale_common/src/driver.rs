//! Hardware driver traits and error types.
//!
//! The core emits abstract commands only — a speed fraction, an angle
//! in degrees, an explicit brake — and the driver behind these traits
//! turns them into PWM and digital I/O. Simulation drivers in
//! `gale_control_unit` implement the same traits for tests and bench
//! runs.
//!
//! # Lifecycle
//!
//! 1. Construct the driver (may touch hardware — fallible)
//! 2. Per-cycle writes from the actuator loop
//! 3. Release command (`brake` / `detach`) during shutdown

use thiserror::Error;

/// Error types for driver operations.
#[derive(Debug, Clone, Error)]
pub enum DriverError {
    /// Driver initialization failed.
    #[error("initialization failed: {0}")]
    InitFailed(String),

    /// A per-cycle hardware write was rejected.
    #[error("hardware write failed: {0}")]
    WriteFailed(String),

    /// An analog read was rejected.
    #[error("hardware read failed: {0}")]
    ReadFailed(String),
}

/// DC motor driver: proportional forward drive plus an active brake.
///
/// A write failure is recovered by the caller (logged, cycle skipped);
/// implementations must not panic on rejection.
pub trait MotorDriver: Send {
    /// Drive forward at `speed`, a fraction in [0.0, 1.0].
    ///
    /// Callers clamp before handing the value over; implementations may
    /// assume it is in range.
    fn forward(&mut self, speed: f64) -> Result<(), DriverError>;

    /// Active brake: both direction outputs asserted, zero duty.
    fn brake(&mut self) -> Result<(), DriverError>;
}

/// Positional servo driver.
pub trait ServoDriver: Send {
    /// Apply an absolute angle [deg]. Callers clamp to the configured
    /// range first.
    fn set_angle(&mut self, degrees: i32) -> Result<(), DriverError>;

    /// Release the drive signal (stop sending pulses).
    fn detach(&mut self) -> Result<(), DriverError>;
}

/// Analog input channel for the potentiometer input mode.
pub trait AnalogInput: Send {
    /// Read the current input voltage [V].
    fn read_volts(&mut self) -> Result<f64, DriverError>;
}
