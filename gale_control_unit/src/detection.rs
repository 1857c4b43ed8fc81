//! Detection-cycle entry point.
//!
//! The external classifier thread owns acquisition and inference; each
//! time it finishes an inference pass it hands the abstracted outputs
//! to [`DetectionCycle::submit`]. Within one cycle the ordering is
//! fixed: interlock first, then fusion, then jog debouncing — so the
//! interlock's zero always lands before a fused target could.

use crate::fusion::{self, FusionResult};
use crate::jog::JogDebouncer;
use crate::safety::SafetyInterlock;
use crate::store::StateStore;
use gale_common::config::{CoreConfig, ServoConfig};
use gale_common::observation::Observation;
use gale_common::state::FusionTier;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Per-detection-cycle pipeline: interlock → fusion → jog → store.
#[derive(Debug)]
pub struct DetectionCycle {
    store: Arc<StateStore>,
    interlock: SafetyInterlock,
    debouncer: JogDebouncer,
    servo: ServoConfig,
}

impl DetectionCycle {
    /// Build the pipeline from config.
    pub fn new(store: Arc<StateStore>, config: &CoreConfig) -> Self {
        Self {
            interlock: SafetyInterlock::new(Arc::clone(&store)),
            debouncer: JogDebouncer::new(config.servo.jog_debounce(), config.servo.step_degrees),
            servo: config.servo.clone(),
            store,
        }
    }

    /// Run one detection cycle with the current wall clock.
    pub fn submit(&mut self, primary: Observation, secondary: Observation, presence: bool) {
        self.submit_at(primary, secondary, presence, Instant::now());
    }

    /// Run one detection cycle at an explicit instant (tests drive
    /// the debounce window deterministically through this).
    pub fn submit_at(
        &mut self,
        primary: Observation,
        secondary: Observation,
        presence: bool,
        now: Instant,
    ) {
        // Interlock writes first; fusion's rule 1 honors the same flag.
        self.interlock.observe(presence);

        let result = fusion::fuse(primary, secondary, presence);
        self.apply_motor_decision(&result);

        if let Some(delta) = self.debouncer.submit(result.jog, now) {
            let servo = self.servo.clone();
            let mut applied = 0;
            self.store.update(|s| {
                applied = servo.clamp_angle(s.target_servo_angle + delta);
                s.target_servo_angle = applied;
            });
            debug!(delta, target = applied, "servo jog accepted");
        }
    }

    /// Potentiometer input mode: a single voltage read substitutes for
    /// the fusion engine. The presence interlock still preempts.
    pub fn submit_voltage(&mut self, volts: f64, presence: bool) {
        self.interlock.observe(presence);

        let speed = fusion::speed_from_voltage(volts);
        self.store.update(|s| {
            s.voltage = volts;
            s.tier = FusionTier::None;
            if !s.presence {
                s.target_speed = speed;
            }
        });
    }

    fn apply_motor_decision(&self, result: &FusionResult) {
        self.store.update(|s| {
            // While presence is set the interlock's zero stands; fusion
            // never overwrites it (second layer of the same invariant).
            if s.presence {
                return;
            }
            s.tier = result.tier;
            if let Some(speed) = result.speed {
                s.target_speed = speed.clamp(0.0, 1.0);
                s.finger_count = result.finger_count;
            }
            // speed == None is rule 6: hold the previous target.
        });
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use gale_common::observation::SignLabel;
    use std::time::Duration;

    fn sign(label: SignLabel) -> Observation {
        Observation::Sign {
            label,
            confidence: 0.9,
        }
    }

    fn fingers(count: u8) -> Observation {
        Observation::FingerCount { count }
    }

    fn cycle() -> (Arc<StateStore>, DetectionCycle) {
        let store = Arc::new(StateStore::new());
        let dc = DetectionCycle::new(Arc::clone(&store), &CoreConfig::default());
        (store, dc)
    }

    #[test]
    fn confirmed_decision_lands_in_store() {
        let (store, mut dc) = cycle();
        dc.submit(sign(SignLabel::V), fingers(2), false);
        let snap = store.snapshot();
        assert_eq!(snap.target_speed, 0.6);
        assert_eq!(snap.tier, FusionTier::Confirmed);
        assert_eq!(snap.finger_count, Some(2));
    }

    #[test]
    fn no_detection_holds_previous_target() {
        let (store, mut dc) = cycle();
        dc.submit(sign(SignLabel::V), fingers(2), false);
        dc.submit(Observation::Absent, Observation::Absent, false);
        let snap = store.snapshot();
        assert_eq!(snap.target_speed, 0.6);
        assert_eq!(snap.tier, FusionTier::None);
    }

    #[test]
    fn presence_mid_gesture_forces_zero_target() {
        let (store, mut dc) = cycle();
        dc.submit(sign(SignLabel::W), fingers(3), false);
        assert_eq!(store.snapshot().target_speed, 1.0);

        dc.submit(sign(SignLabel::W), fingers(3), true);
        let snap = store.snapshot();
        assert!(snap.presence);
        assert_eq!(snap.target_speed, 0.0);
        assert_eq!(snap.finger_count, None);
    }

    #[test]
    fn jog_steps_are_debounced_and_clamped() {
        let (store, mut dc) = cycle();
        let base = Instant::now();

        // Three positive jogs 50 ms apart: only the first accepted.
        for i in 0..3 {
            dc.submit_at(
                sign(SignLabel::T),
                Observation::Absent,
                false,
                base + Duration::from_millis(50 * i),
            );
        }
        assert_eq!(store.snapshot().target_servo_angle, 5);

        // Next debounce window elapses: one more step.
        dc.submit_at(
            sign(SignLabel::T),
            Observation::Absent,
            false,
            base + Duration::from_millis(350),
        );
        assert_eq!(store.snapshot().target_servo_angle, 10);
    }

    #[test]
    fn jog_clamps_at_range_limit() {
        let (store, mut dc) = cycle();
        store.update(|s| s.target_servo_angle = 88);
        dc.submit(sign(SignLabel::T), Observation::Absent, false);
        assert_eq!(store.snapshot().target_servo_angle, 90);
    }

    #[test]
    fn jog_sign_does_not_zero_motor_target() {
        let (store, mut dc) = cycle();
        dc.submit(sign(SignLabel::V), fingers(2), false);
        dc.submit(sign(SignLabel::T), Observation::Absent, false);
        // Motor target held, servo target stepped.
        let snap = store.snapshot();
        assert_eq!(snap.target_speed, 0.6);
        assert_eq!(snap.target_servo_angle, 5);
    }

    #[test]
    fn voltage_mode_maps_thresholds() {
        let (store, mut dc) = cycle();
        dc.submit_voltage(1.8, false);
        let snap = store.snapshot();
        assert_eq!(snap.target_speed, 0.6);
        assert_eq!(snap.voltage, 1.8);

        dc.submit_voltage(2.5, false);
        assert_eq!(store.snapshot().target_speed, 1.0);
    }

    #[test]
    fn voltage_mode_respects_interlock() {
        let (store, mut dc) = cycle();
        dc.submit_voltage(2.5, true);
        let snap = store.snapshot();
        assert_eq!(snap.target_speed, 0.0);
        assert_eq!(snap.voltage, 2.5);
    }
}
