//! TOML configuration loader with validation.
//!
//! Every timing interval, angle limit, and jog parameter is a named
//! configuration field with a serde default, so a missing file section
//! falls back to the stock fan tuning. `validate()` rejects
//! inconsistent limits before any actuator loop is spawned.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

// ─── Error Type ─────────────────────────────────────────────────────

/// Configuration loading/validation error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("config I/O error: {0}")]
    Io(String),
    /// TOML parse error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Parameter validation error.
    #[error("config validation: {0}")]
    Validation(String),
}

// ─── Defaults ───────────────────────────────────────────────────────

/// Motor loop period [ms].
pub const DEFAULT_MOTOR_PERIOD_MS: u64 = 100;
/// Servo loop period [ms].
pub const DEFAULT_SERVO_PERIOD_MS: u64 = 50;
/// Servo settle time after a move [ms].
pub const DEFAULT_SERVO_SETTLE_MS: u64 = 100;
/// Minimum servo angle [deg].
pub const DEFAULT_SERVO_MIN_ANGLE: i32 = -90;
/// Maximum servo angle [deg].
pub const DEFAULT_SERVO_MAX_ANGLE: i32 = 90;
/// Jog step size [deg].
pub const DEFAULT_JOG_STEP_DEGREES: i32 = 5;
/// Minimum time between two accepted jog steps [ms].
pub const DEFAULT_JOG_DEBOUNCE_MS: u64 = 300;
/// Per-loop join timeout during shutdown [ms].
pub const DEFAULT_JOIN_TIMEOUT_MS: u64 = 2000;

// ─── Config Structs ─────────────────────────────────────────────────

/// Which input path feeds the motor target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Dual-classifier gesture fusion (primary sign + secondary finger count).
    #[default]
    Gesture,
    /// Analog voltage threshold table substitutes for the fusion engine.
    Potentiometer,
}

/// Motor actuator loop tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorConfig {
    /// Loop period [ms].
    pub period_ms: u64,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            period_ms: DEFAULT_MOTOR_PERIOD_MS,
        }
    }
}

impl MotorConfig {
    /// Loop period as a [`Duration`].
    #[inline]
    pub const fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }
}

/// Servo actuator loop tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServoConfig {
    /// Loop period [ms].
    pub period_ms: u64,
    /// Settle time after applying a new angle [ms].
    pub settle_ms: u64,
    /// Minimum angle [deg].
    pub min_angle: i32,
    /// Maximum angle [deg].
    pub max_angle: i32,
    /// Jog step size [deg].
    pub step_degrees: i32,
    /// Minimum time between two accepted jog steps [ms].
    pub jog_debounce_ms: u64,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            period_ms: DEFAULT_SERVO_PERIOD_MS,
            settle_ms: DEFAULT_SERVO_SETTLE_MS,
            min_angle: DEFAULT_SERVO_MIN_ANGLE,
            max_angle: DEFAULT_SERVO_MAX_ANGLE,
            step_degrees: DEFAULT_JOG_STEP_DEGREES,
            jog_debounce_ms: DEFAULT_JOG_DEBOUNCE_MS,
        }
    }
}

impl ServoConfig {
    /// Loop period as a [`Duration`].
    #[inline]
    pub const fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }

    /// Settle time as a [`Duration`].
    #[inline]
    pub const fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// Jog debounce interval as a [`Duration`].
    #[inline]
    pub const fn jog_debounce(&self) -> Duration {
        Duration::from_millis(self.jog_debounce_ms)
    }

    /// Clamp an angle to the configured range.
    #[inline]
    pub fn clamp_angle(&self, angle: i32) -> i32 {
        angle.clamp(self.min_angle, self.max_angle)
    }
}

/// Shutdown handshake tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Per-loop join timeout [ms]. A loop still draining past this is
    /// detached so the process can always exit.
    pub join_timeout_ms: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            join_timeout_ms: DEFAULT_JOIN_TIMEOUT_MS,
        }
    }
}

impl ShutdownConfig {
    /// Join timeout as a [`Duration`].
    #[inline]
    pub const fn join_timeout(&self) -> Duration {
        Duration::from_millis(self.join_timeout_ms)
    }
}

/// Complete core configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Input path selection.
    pub input_mode: InputMode,
    /// Motor loop tuning.
    pub motor: MotorConfig,
    /// Servo loop tuning.
    pub servo: ServoConfig,
    /// Shutdown handshake tuning.
    pub shutdown: ShutdownConfig,
}

impl CoreConfig {
    /// Validate parameter consistency.
    ///
    /// Rejects: inverted or degenerate angle range, a range that does
    /// not contain the 0° neutral position, zero loop periods, and a
    /// non-positive jog step.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.servo.min_angle >= self.servo.max_angle {
            return Err(ConfigError::Validation(format!(
                "servo angle range inverted: min {} >= max {}",
                self.servo.min_angle, self.servo.max_angle
            )));
        }
        if self.servo.min_angle > 0 || self.servo.max_angle < 0 {
            return Err(ConfigError::Validation(format!(
                "servo range [{}, {}] must contain the 0° neutral position",
                self.servo.min_angle, self.servo.max_angle
            )));
        }
        if self.servo.step_degrees <= 0 {
            return Err(ConfigError::Validation(format!(
                "jog step must be positive, got {}",
                self.servo.step_degrees
            )));
        }
        if self.motor.period_ms == 0 || self.servo.period_ms == 0 {
            return Err(ConfigError::Validation(
                "loop periods must be nonzero".into(),
            ));
        }
        Ok(())
    }
}

// ─── Loading Functions ──────────────────────────────────────────────

/// Load and validate the core configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<CoreConfig, ConfigError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Io(format!("failed to read {}: {e}", path.display())))?;
    load_config_from_str(&text)
}

/// Load config from a TOML string (also used by tests).
pub fn load_config_from_str(text: &str) -> Result<CoreConfig, ConfigError> {
    let config: CoreConfig =
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg = load_config_from_str("").unwrap();
        assert_eq!(cfg.input_mode, InputMode::Gesture);
        assert_eq!(cfg.motor.period_ms, DEFAULT_MOTOR_PERIOD_MS);
        assert_eq!(cfg.servo.min_angle, -90);
        assert_eq!(cfg.servo.max_angle, 90);
        assert_eq!(cfg.servo.step_degrees, 5);
        assert_eq!(cfg.servo.jog_debounce_ms, 300);
        assert_eq!(cfg.shutdown.join_timeout_ms, 2000);
    }

    #[test]
    fn partial_overrides() {
        let cfg = load_config_from_str(
            r#"
            input_mode = "potentiometer"

            [servo]
            min_angle = -45
            max_angle = 45
            step_degrees = 10
            "#,
        )
        .unwrap();
        assert_eq!(cfg.input_mode, InputMode::Potentiometer);
        assert_eq!(cfg.servo.min_angle, -45);
        assert_eq!(cfg.servo.step_degrees, 10);
        // Untouched sections keep defaults.
        assert_eq!(cfg.servo.settle_ms, DEFAULT_SERVO_SETTLE_MS);
        assert_eq!(cfg.motor.period_ms, DEFAULT_MOTOR_PERIOD_MS);
    }

    #[test]
    fn inverted_angle_range_rejected() {
        let err = load_config_from_str(
            r#"
            [servo]
            min_angle = 90
            max_angle = -90
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn range_excluding_neutral_rejected() {
        let err = load_config_from_str(
            r#"
            [servo]
            min_angle = 10
            max_angle = 90
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn zero_step_rejected() {
        let err = load_config_from_str(
            r#"
            [servo]
            step_degrees = 0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn zero_period_rejected() {
        let err = load_config_from_str(
            r#"
            [motor]
            period_ms = 0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = load_config_from_str("[servo\nmin_angle = -90").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "[motor]\nperiod_ms = 20").unwrap();
        let cfg = load_config(f.path()).unwrap();
        assert_eq!(cfg.motor.period_ms, 20);
        assert_eq!(cfg.motor.period(), Duration::from_millis(20));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/gale.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn clamp_angle_respects_range() {
        let servo = ServoConfig::default();
        assert_eq!(servo.clamp_angle(500), 90);
        assert_eq!(servo.clamp_angle(-500), -90);
        assert_eq!(servo.clamp_angle(15), 15);
    }
}
