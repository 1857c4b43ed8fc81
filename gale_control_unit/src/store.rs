//! Thread-safe owner of the full system snapshot.
//!
//! One exclusive lock covers the whole [`SystemState`], so a
//! `snapshot()` is always internally consistent — never a mix of old
//! and new values across fields. No I/O happens while the lock is
//! held; callers copy out, drop the lock, then talk to hardware.

use gale_common::state::SystemState;
use parking_lot::Mutex;

/// Shared-state container for the detection path and both actuator
/// loops. All communication between loops goes through this store.
#[derive(Debug, Default)]
pub struct StateStore {
    inner: Mutex<SystemState>,
}

impl StateStore {
    /// Create a store with all-zero/neutral defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically consistent copy of the entire state.
    pub fn snapshot(&self) -> SystemState {
        *self.inner.lock()
    }

    /// Apply a field mutation atomically.
    ///
    /// The mutator must not perform I/O or block; it runs under the
    /// store lock.
    pub fn update<F>(&self, mutator: F)
    where
        F: FnOnce(&mut SystemState),
    {
        mutator(&mut self.inner.lock());
    }

    /// Set or clear the presence interlock flag.
    pub fn set_presence(&self, present: bool) {
        self.update(|s| s.presence = present);
    }

    /// Request global shutdown. Every loop observes this within one
    /// cycle period and performs its release sequence.
    pub fn request_stop(&self) {
        self.update(|s| s.stop_requested = true);
    }

    /// Whether shutdown has been requested.
    pub fn stop_requested(&self) -> bool {
        self.inner.lock().stop_requested
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
