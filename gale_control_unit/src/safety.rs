//! Presence safety interlock.
//!
//! Whenever a person is detected in frame, the motor command must go
//! to the safe value before the next actuator cycle completes. The
//! interlock runs every detection cycle with higher priority than the
//! fusion engine: it writes its zero first, and fusion refuses to
//! overwrite a target while presence is set. The motor loop re-checks
//! `presence` directly each cycle as a second, independent barrier.

use crate::store::StateStore;
use gale_common::state::FusionTier;
use std::sync::Arc;
use tracing::info;

/// Evaluates the presence signal and forces the safe command.
#[derive(Debug)]
pub struct SafetyInterlock {
    store: Arc<StateStore>,
    engaged: bool,
}

impl SafetyInterlock {
    /// Create an interlock bound to the shared store.
    pub fn new(store: Arc<StateStore>) -> Self {
        Self {
            store,
            engaged: false,
        }
    }

    /// Whether the interlock is currently engaged.
    #[inline]
    pub const fn engaged(&self) -> bool {
        self.engaged
    }

    /// Record the presence signal for this detection cycle.
    ///
    /// On `present == true` this atomically sets the flag, zeroes
    /// `target_speed`, and clears `finger_count` — the interlock's
    /// zero wins over any fusion result computed in the same cycle
    /// because fusion runs after it and honors the flag.
    pub fn observe(&mut self, present: bool) {
        if present {
            self.store.update(|s| {
                s.presence = true;
                s.target_speed = 0.0;
                s.finger_count = None;
                s.tier = FusionTier::None;
            });
            if !self.engaged {
                info!("presence interlock engaged: motor forced to 0");
                self.engaged = true;
            }
        } else {
            self.store.set_presence(false);
            if self.engaged {
                info!("presence interlock cleared");
                self.engaged = false;
            }
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
