//! Motor actuator loop.
//!
//! Each cycle: snapshot the store, check `presence` before touching
//! the target (the interlock check always precedes the apply), then
//! either command the active brake or proportional forward drive and
//! publish `motor_speed_actual`. The loop's only exit path runs a
//! final brake command, so the motor is never left driving.

use crate::store::StateStore;
use gale_common::config::MotorConfig;
use gale_common::driver::{DriverError, MotorDriver};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{error, info, warn};

/// Periodic motor command loop.
#[derive(Debug)]
pub struct MotorLoop<D: MotorDriver> {
    store: Arc<StateStore>,
    driver: D,
    period: Duration,
}

impl<D: MotorDriver> MotorLoop<D> {
    /// Create the loop around a driver.
    pub fn new(store: Arc<StateStore>, driver: D, config: &MotorConfig) -> Self {
        Self {
            store,
            driver,
            period: config.period(),
        }
    }

    /// Initial brake command, proving the driver is reachable.
    ///
    /// A failure here is fatal for the whole core: the caller signals
    /// `stop_requested` rather than running with a half-alive actuator.
    pub fn initialize(&mut self) -> Result<(), DriverError> {
        self.driver.brake()?;
        self.store.update(|s| s.motor_speed_actual = 0);
        Ok(())
    }

    /// One motor cycle: interlock check, then command, then telemetry.
    pub fn cycle(&mut self) {
        let snap = self.store.snapshot();

        if snap.presence {
            // Active brake regardless of any concurrently-fused target.
            if let Err(e) = self.driver.brake() {
                warn!("motor brake write failed, skipping cycle: {e}");
                return;
            }
            self.store.update(|s| s.motor_speed_actual = 0);
        } else {
            let speed = snap.target_speed.clamp(0.0, 1.0);
            if let Err(e) = self.driver.forward(speed) {
                warn!("motor forward write failed, skipping cycle: {e}");
                return;
            }
            self.store
                .update(|s| s.motor_speed_actual = (speed * 100.0).round() as u8);
        }
    }

    /// Run until `stop_requested`, then brake and exit.
    pub fn run(&mut self) {
        info!("motor loop started (period {:?})", self.period);

        if let Err(e) = self.initialize() {
            error!("motor init failed: {e}; requesting core shutdown");
            self.store.request_stop();
        } else {
            while !self.store.stop_requested() {
                self.cycle();
                thread::sleep(self.period);
            }
        }

        self.release();
    }

    /// Guaranteed final brake.
    fn release(&mut self) {
        if let Err(e) = self.driver.brake() {
            error!("final motor brake failed: {e}");
        }
        self.store.update(|s| s.motor_speed_actual = 0);
        info!("motor loop stopped (braked)");
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
