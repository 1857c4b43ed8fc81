//! Tagged classifier observation model.
//!
//! The detection side produces heterogeneous outputs: the primary sign
//! classifier emits a discrete label with a confidence, the secondary
//! landmark counter emits a raw finger count, and the potentiometer
//! path emits a voltage. All of them are unified behind one tagged
//! [`Observation`] so the fusion engine never touches
//! classifier-specific shapes.

use serde::{Deserialize, Serialize};

/// Direction of a single discrete servo jog request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JogDirection {
    /// One step towards `max_angle`.
    Positive,
    /// One step towards `min_angle`.
    Negative,
}

impl JogDirection {
    /// Signed unit sign of the direction.
    #[inline]
    pub const fn sign(self) -> i32 {
        match self {
            Self::Positive => 1,
            Self::Negative => -1,
        }
    }
}

/// Discrete sign codes recognized by the primary classifier.
///
/// S/O/D/X/V/W map to motor speed via their canonical finger counts;
/// T (thumb only) and Y (pinky only) are reserved for servo jog and
/// never resolve to a motor count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignLabel {
    /// Fist.
    S,
    /// Circle.
    O,
    /// Index point.
    D,
    /// Hooked index.
    X,
    /// Two fingers.
    V,
    /// Three fingers.
    W,
    /// Thumb only — jog positive.
    T,
    /// Pinky only — jog negative.
    Y,
}

impl SignLabel {
    /// Canonical finger count for motor-relevant signs.
    ///
    /// Jog signs (T, Y) have no motor meaning and return `None`.
    #[inline]
    pub const fn canonical_fingers(self) -> Option<u8> {
        match self {
            Self::S | Self::O => Some(0),
            Self::D | Self::X => Some(1),
            Self::V => Some(2),
            Self::W => Some(3),
            Self::T | Self::Y => None,
        }
    }

    /// Jog direction for servo-reserved signs.
    #[inline]
    pub const fn jog(self) -> Option<JogDirection> {
        match self {
            Self::T => Some(JogDirection::Positive),
            Self::Y => Some(JogDirection::Negative),
            _ => None,
        }
    }
}

/// Raw finger counts the secondary classifier reserves for jog:
/// four raised fingers jogs positive, five jogs negative.
pub const SECONDARY_JOG_POSITIVE_COUNT: u8 = 4;
pub const SECONDARY_JOG_NEGATIVE_COUNT: u8 = 5;

/// One classifier output for one detection cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Observation {
    /// Primary classifier: discrete sign with confidence in [0, 1].
    Sign { label: SignLabel, confidence: f32 },
    /// Secondary classifier: raw raised-finger count in [0, 5].
    FingerCount { count: u8 },
    /// Analog input: last read voltage [V].
    Voltage { volts: f64 },
    /// The classifier produced nothing this cycle.
    Absent,
}

impl Observation {
    /// Canonical motor finger count, if this observation is
    /// motor-relevant.
    ///
    /// Sign observations resolve through the sign alphabet; raw finger
    /// counts resolve directly for 0–3 and are jog-reserved above that.
    #[inline]
    pub const fn motor_count(&self) -> Option<u8> {
        match self {
            Self::Sign { label, .. } => label.canonical_fingers(),
            Self::FingerCount { count } if *count <= 3 => Some(*count),
            _ => None,
        }
    }

    /// Jog request carried by this observation, if any.
    #[inline]
    pub const fn jog(&self) -> Option<JogDirection> {
        match self {
            Self::Sign { label, .. } => label.jog(),
            Self::FingerCount { count } => match *count {
                SECONDARY_JOG_POSITIVE_COUNT => Some(JogDirection::Positive),
                SECONDARY_JOG_NEGATIVE_COUNT => Some(JogDirection::Negative),
                _ => None,
            },
            _ => None,
        }
    }

    /// Whether the classifier saw anything at all this cycle.
    #[inline]
    pub const fn is_present(&self) -> bool {
        !matches!(self, Self::Absent)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
