//! Servo actuator loop.
//!
//! Idle → Moving → Idle: when the clamped target differs from the
//! last applied angle the loop applies it, blocks for the settle time,
//! then publishes `servo_angle_actual`. When unchanged it idles. On
//! shutdown the servo returns to the 0° neutral, settles, and the
//! drive signal is released.

use crate::store::StateStore;
use gale_common::config::ServoConfig;
use gale_common::driver::{DriverError, ServoDriver};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, info, warn};

/// What one servo cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServoAction {
    /// Target matches the last applied angle.
    Idle,
    /// Applied a new angle and settled.
    Moved {
        /// Angle before the move [deg].
        from: i32,
        /// Angle applied [deg].
        to: i32,
    },
}

/// Periodic servo command loop.
#[derive(Debug)]
pub struct ServoLoop<D: ServoDriver> {
    store: Arc<StateStore>,
    driver: D,
    config: ServoConfig,
    /// Last angle actually applied; the loop idles while the clamped
    /// target equals this.
    last_applied: i32,
}

impl<D: ServoDriver> ServoLoop<D> {
    /// Create the loop around a driver. Initial state is Idle at 0°.
    pub fn new(store: Arc<StateStore>, driver: D, config: &ServoConfig) -> Self {
        Self {
            store,
            driver,
            config: config.clone(),
            last_applied: 0,
        }
    }

    /// Drive to the 0° neutral and settle.
    ///
    /// A failure here is fatal for the whole core: the caller signals
    /// `stop_requested` rather than running with a half-alive actuator.
    pub fn initialize(&mut self) -> Result<(), DriverError> {
        self.driver.set_angle(0)?;
        thread::sleep(self.config.settle());
        self.last_applied = 0;
        // Only `servo_angle_actual` belongs to this loop; a target
        // commanded before init finishes must survive it.
        self.store.update(|s| s.servo_angle_actual = 0);
        Ok(())
    }

    /// One servo cycle: clamp, apply if changed, settle, publish.
    pub fn cycle(&mut self) -> ServoAction {
        let snap = self.store.snapshot();
        let target = self.config.clamp_angle(snap.target_servo_angle);

        if target == self.last_applied {
            return ServoAction::Idle;
        }

        if let Err(e) = self.driver.set_angle(target) {
            warn!("servo write failed, skipping cycle: {e}");
            return ServoAction::Idle;
        }

        // Block for the settle time before accepting a further change.
        thread::sleep(self.config.settle());

        let from = self.last_applied;
        self.last_applied = target;
        let config = &self.config;
        self.store.update(|s| {
            s.servo_angle_actual = target;
            // Re-clamp whatever the target is *now*, not the pre-settle
            // snapshot: a command accepted during the settle must not be
            // overwritten here.
            s.target_servo_angle = config.clamp_angle(s.target_servo_angle);
        });
        debug!("servo {from}° → {target}°");

        ServoAction::Moved { from, to: target }
    }

    /// Run until `stop_requested`, then return to neutral and detach.
    pub fn run(&mut self) {
        info!(
            "servo loop started (period {:?}, range [{}, {}])",
            self.config.period(),
            self.config.min_angle,
            self.config.max_angle
        );

        if let Err(e) = self.initialize() {
            error!("servo init failed: {e}; requesting core shutdown");
            self.store.request_stop();
        } else {
            while !self.store.stop_requested() {
                self.cycle();
                thread::sleep(self.config.period());
            }
        }

        self.release();
    }

    /// Guaranteed return-to-neutral and drive release.
    fn release(&mut self) {
        if let Err(e) = self.driver.set_angle(0) {
            warn!("servo neutral return failed: {e}");
        } else {
            thread::sleep(self.config.settle());
        }
        if let Err(e) = self.driver.detach() {
            warn!("servo detach failed: {e}");
        }
        self.last_applied = 0;
        self.store.update(|s| s.servo_angle_actual = 0);
        info!("servo loop stopped (neutral, detached)");
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
