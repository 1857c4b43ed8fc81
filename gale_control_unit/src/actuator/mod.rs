//! Actuator polling loops.
//!
//! Each loop runs on its own thread with a fixed coarse period, reads
//! the shared store at the top of every cycle (stop flag, then
//! presence, then target), writes at most one hardware command per
//! cycle, and publishes telemetry back to the store. Hardware-write
//! failures are logged and the cycle skipped — never fatal, never
//! retried mid-cycle.

pub mod motor;
pub mod servo;
