//! Jog request debouncing.
//!
//! A held jog gesture produces one detection per classifier cycle —
//! far faster than the servo should step. The debouncer turns that
//! stream into discrete, non-jittering increments: at most one step
//! per debounce interval, so a held gesture jogs continuously while
//! sub-interval chatter is suppressed.

use gale_common::observation::JogDirection;
use std::time::{Duration, Instant};

/// Rate-limits jog requests into discrete angle increments.
#[derive(Debug)]
pub struct JogDebouncer {
    /// Minimum time between two accepted steps.
    interval: Duration,
    /// Step size [deg].
    step_degrees: i32,
    /// When the last step was accepted. `None` until the first accept.
    last_applied: Option<Instant>,
}

impl JogDebouncer {
    /// Create a debouncer with the given interval and step size.
    pub const fn new(interval: Duration, step_degrees: i32) -> Self {
        Self {
            interval,
            step_degrees,
            last_applied: None,
        }
    }

    /// Submit this cycle's jog request.
    ///
    /// Returns the signed angle delta to apply, or `None` when there
    /// is no request or the request falls inside the debounce window.
    /// The first request after construction is always accepted.
    pub fn submit(&mut self, jog: Option<JogDirection>, now: Instant) -> Option<i32> {
        let direction = jog?;

        if let Some(last) = self.last_applied {
            if now.duration_since(last) < self.interval {
                return None;
            }
        }

        self.last_applied = Some(now);
        Some(self.step_degrees * direction.sign())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(300);

    fn debouncer() -> JogDebouncer {
        JogDebouncer::new(INTERVAL, 5)
    }

    #[test]
    fn none_request_yields_nothing() {
        let mut d = debouncer();
        assert_eq!(d.submit(None, Instant::now()), None);
    }

    #[test]
    fn first_request_accepted_immediately() {
        let mut d = debouncer();
        let now = Instant::now();
        assert_eq!(d.submit(Some(JogDirection::Positive), now), Some(5));
        assert_eq!(d.submit(Some(JogDirection::Negative), now), None);
    }

    #[test]
    fn sub_interval_chatter_suppressed() {
        let mut d = debouncer();
        let base = Instant::now();
        assert_eq!(d.submit(Some(JogDirection::Positive), base), Some(5));
        assert_eq!(
            d.submit(Some(JogDirection::Positive), base + Duration::from_millis(50)),
            None
        );
        assert_eq!(
            d.submit(Some(JogDirection::Positive), base + Duration::from_millis(299)),
            None
        );
    }

    #[test]
    fn interval_boundary_accepts() {
        let mut d = debouncer();
        let base = Instant::now();
        assert_eq!(d.submit(Some(JogDirection::Positive), base), Some(5));
        // Exactly the interval later is accepted (>=, not >).
        assert_eq!(d.submit(Some(JogDirection::Positive), base + INTERVAL), Some(5));
    }

    #[test]
    fn held_gesture_steps_once_per_interval() {
        let mut d = debouncer();
        let base = Instant::now();
        let mut accepted = 0;
        // One submission every 50 ms for one second.
        for i in 0..=20 {
            let t = base + Duration::from_millis(50 * i);
            if d.submit(Some(JogDirection::Positive), t).is_some() {
                accepted += 1;
            }
        }
        // Accepted at 0, 300, 600, 900 ms.
        assert_eq!(accepted, 4);
    }

    #[test]
    fn negative_direction_steps_down() {
        let mut d = debouncer();
        assert_eq!(
            d.submit(Some(JogDirection::Negative), Instant::now()),
            Some(-5)
        );
    }

    #[test]
    fn suppressed_request_does_not_reset_window() {
        let mut d = debouncer();
        let base = Instant::now();
        assert_eq!(d.submit(Some(JogDirection::Positive), base), Some(5));
        // A suppressed request at 200 ms must not push the window out.
        assert_eq!(
            d.submit(Some(JogDirection::Positive), base + Duration::from_millis(200)),
            None
        );
        assert_eq!(
            d.submit(Some(JogDirection::Positive), base + Duration::from_millis(310)),
            Some(5)
        );
    }
}
