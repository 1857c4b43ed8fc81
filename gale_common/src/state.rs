//! The shared system state snapshot.
//!
//! One plain-data structure holds everything the three loops exchange:
//! observed inputs, fused targets, actuator telemetry, the presence
//! interlock flag, and the global stop flag. It is owned exclusively by
//! the control unit's `StateStore`; nothing outside the store mutates
//! it directly.

use serde::{Deserialize, Serialize};

/// Confidence classification of a motor-speed decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FusionTier {
    /// Both classifiers agreed on the canonical finger count.
    Confirmed,
    /// Primary classifier decided (alone, or winning a disagreement).
    PrimaryOnly,
    /// Secondary classifier decided as backup.
    SecondaryOnly,
    /// No motor-speed decision this cycle.
    #[default]
    None,
}

/// Full system snapshot shared between the detection path and the two
/// actuator loops.
///
/// `target_speed` is 0.0 whenever `presence` is true (the interlock
/// writes it and the motor loop independently re-checks).
/// `target_servo_angle` always lies within the configured angle range
/// once the servo loop has clamped it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SystemState {
    /// Last read analog input [V] (potentiometer mode), informational.
    pub voltage: f64,
    /// Last percentage commanded to the motor [0, 100].
    pub motor_speed_actual: u8,
    /// Last angle actually applied to the servo [deg].
    pub servo_angle_actual: i32,
    /// Fused motor command [0.0, 1.0].
    pub target_speed: f64,
    /// Debounced servo command [deg].
    pub target_servo_angle: i32,
    /// Last resolved gesture magnitude, for telemetry.
    pub finger_count: Option<u8>,
    /// Tier of the last motor-speed decision, for telemetry.
    pub tier: FusionTier,
    /// Presence interlock flag: a person is in frame.
    pub presence: bool,
    /// Global shutdown flag, polled at the top of every loop iteration.
    pub stop_requested: bool,
}

// ─── Tests ──────────────────────────────────────────────────────────
