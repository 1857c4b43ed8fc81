//! # GALE Control Unit Library
//!
//! Concurrent actuation-and-fusion core for a gesture-controlled fan.
//! Two independent classifiers (a discrete sign detector and a landmark
//! finger counter) are reconciled into one motor command with a
//! confidence tier; a presence interlock preempts everything; and two
//! actuator polling loops (motor speed, servo angle) apply the fused
//! targets with debouncing, clamping, and guaranteed safe shutdown.
//!
//! ## Components
//!
//! 1. [`store::StateStore`] — single-lock shared system snapshot
//! 2. [`safety::SafetyInterlock`] — presence override, runs before fusion
//! 3. [`fusion`] — dual-classifier decision engine + voltage fallback
//! 4. [`jog::JogDebouncer`] — rate-limited discrete servo increments
//! 5. [`actuator::motor::MotorLoop`] — periodic motor command loop
//! 6. [`actuator::servo::ServoLoop`] — periodic servo command loop
//! 7. [`orchestrator::Orchestrator`] — loop lifecycle + shutdown handshake
//!
//! The loops share memory only through the `StateStore`; the lock is
//! held only for a field copy or mutation, never across a hardware
//! write.

pub mod actuator;
pub mod detection;
pub mod error;
pub mod fusion;
pub mod jog;
pub mod orchestrator;
pub mod safety;
pub mod sim;
pub mod store;
