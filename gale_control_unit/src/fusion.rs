//! Dual-classifier fusion decision engine.
//!
//! Reconciles the primary sign classifier and the secondary finger
//! counter into one motor command plus a confidence tier, and derives
//! directional jog requests for the servo. The decision rule is
//! deterministic and source-prioritized: the primary classifier wins
//! every disagreement.
//!
//! Also provides the voltage threshold table used when a potentiometer
//! substitutes for the gesture path.

use gale_common::observation::{JogDirection, Observation};
use gale_common::state::FusionTier;

/// Canonical finger-count → speed-fraction lookup table.
pub const SPEED_TABLE: [f64; 4] = [0.0, 0.3, 0.6, 1.0];

/// Speed fraction for a canonical finger count.
///
/// Counts above 3 never reach the table through fusion (they are
/// jog-reserved), but an out-of-range count still clamps to full
/// speed rather than indexing out of bounds.
#[inline]
pub fn speed_for_count(count: u8) -> f64 {
    SPEED_TABLE[count.min(3) as usize]
}

/// Potentiometer threshold table: `<1.0V → 0%`, `1.0–1.6V → 30%`,
/// `1.6–2.0V → 60%`, `>2.0V → 100%`. Boundaries are inclusive on
/// the lower band as listed.
#[inline]
pub fn speed_from_voltage(volts: f64) -> f64 {
    if volts < 1.0 {
        0.0
    } else if volts <= 1.6 {
        0.3
    } else if volts <= 2.0 {
        0.6
    } else {
        1.0
    }
}

/// Outcome of one fusion cycle. Transient — its effect is written
/// into the store and the value itself is dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionResult {
    /// Confidence tier of the motor-speed decision.
    pub tier: FusionTier,
    /// Fused motor command, or `None` to hold the previous target.
    pub speed: Option<f64>,
    /// Canonical finger count behind the decision, for telemetry.
    pub finger_count: Option<u8>,
    /// Directional servo jog request, independent of the motor tier.
    pub jog: Option<JogDirection>,
}

impl FusionResult {
    /// The no-decision result: hold the previous target.
    pub const HOLD: Self = Self {
        tier: FusionTier::None,
        speed: None,
        finger_count: None,
        jog: None,
    };
}

/// Fuse one detection cycle's observations into a motor decision and
/// a jog request.
///
/// Decision order:
/// 1. Presence interlock active → speed 0.0, tier `None`.
/// 2. Both motor-relevant and counts equal → `Confirmed`.
/// 3. Both motor-relevant, counts differ → `PrimaryOnly` (primary wins).
/// 4. Primary only → `PrimaryOnly`.
/// 5. Secondary only → `SecondaryOnly`.
/// 6. Neither → hold the previous target (`speed: None`).
///
/// Jog derivation runs every cycle regardless of the motor tier: the
/// primary's jog signs win, the secondary's jog-reserved counts (4, 5)
/// are the fallback. A single cycle never yields both directions
/// because each observation carries at most one.
pub fn fuse(primary: Observation, secondary: Observation, presence: bool) -> FusionResult {
    let jog = primary.jog().or_else(|| secondary.jog());

    if presence {
        return FusionResult {
            tier: FusionTier::None,
            speed: Some(0.0),
            finger_count: None,
            jog,
        };
    }

    let (tier, count) = match (primary.motor_count(), secondary.motor_count()) {
        (Some(p), Some(s)) if p == s => (FusionTier::Confirmed, Some(p)),
        (Some(p), Some(_)) => (FusionTier::PrimaryOnly, Some(p)),
        (Some(p), None) => (FusionTier::PrimaryOnly, Some(p)),
        (None, Some(s)) => (FusionTier::SecondaryOnly, Some(s)),
        (None, None) => (FusionTier::None, None),
    };

    FusionResult {
        tier,
        speed: count.map(speed_for_count),
        finger_count: count,
        jog,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
