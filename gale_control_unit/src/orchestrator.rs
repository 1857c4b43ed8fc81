//! Loop lifecycle and the shutdown handshake.
//!
//! The orchestrator spawns the motor and servo loops as named threads
//! and owns the shutdown sequence: set `stop_requested`, then wait for
//! each loop's completion signal with a bounded timeout. A loop still
//! draining past the timeout is detached so the process can always
//! exit. The detection path is an external collaborator — it drives
//! [`crate::detection::DetectionCycle`] from its own thread.

use crate::actuator::motor::MotorLoop;
use crate::actuator::servo::ServoLoop;
use crate::error::CoreError;
use crate::store::StateStore;
use gale_common::config::CoreConfig;
use gale_common::driver::{MotorDriver, ServoDriver};
use std::sync::Arc;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{info, warn};

struct LoopHandle {
    name: &'static str,
    handle: JoinHandle<()>,
    done_rx: mpsc::Receiver<()>,
}

/// Starts and stops the actuator loops.
pub struct Orchestrator {
    store: Arc<StateStore>,
    join_timeout: Duration,
    loops: Vec<LoopHandle>,
}

impl Orchestrator {
    /// Spawn the motor and servo loops.
    pub fn start<M, S>(
        config: &CoreConfig,
        store: Arc<StateStore>,
        motor_driver: M,
        servo_driver: S,
    ) -> Result<Self, CoreError>
    where
        M: MotorDriver + 'static,
        S: ServoDriver + 'static,
    {
        let mut loops = Vec::with_capacity(2);

        let mut motor = MotorLoop::new(Arc::clone(&store), motor_driver, &config.motor);
        loops.push(spawn_loop("motor_loop", move || motor.run())?);

        let mut servo = ServoLoop::new(Arc::clone(&store), servo_driver, &config.servo);
        loops.push(spawn_loop("servo_loop", move || servo.run())?);

        info!("orchestrator started {} actuator loops", loops.len());

        Ok(Self {
            store,
            join_timeout: config.shutdown.join_timeout(),
            loops,
        })
    }

    /// Shared store handle.
    pub fn store(&self) -> Arc<StateStore> {
        Arc::clone(&self.store)
    }

    /// Whether any loop has requested a core stop (e.g. failed init).
    pub fn stop_requested(&self) -> bool {
        self.store.stop_requested()
    }

    /// Signal shutdown and wait for every loop's release sequence,
    /// bounded per loop. Proceeds regardless of a loop still draining.
    pub fn shutdown(self) {
        info!("shutdown requested; waiting for actuator loops");
        self.store.request_stop();

        for entry in self.loops {
            match entry.done_rx.recv_timeout(self.join_timeout) {
                Ok(()) => {
                    let _ = entry.handle.join();
                    info!("{} drained cleanly", entry.name);
                }
                Err(_) => {
                    // Detach: exiting matters more than a clean join.
                    warn!(
                        "{} still draining after {:?}; detaching",
                        entry.name, self.join_timeout
                    );
                }
            }
        }

        info!("orchestrator shutdown complete");
    }
}

fn spawn_loop<F>(name: &'static str, body: F) -> Result<LoopHandle, CoreError>
where
    F: FnOnce() + Send + 'static,
{
    let (done_tx, done_rx) = mpsc::channel();
    let handle = thread::Builder::new()
        .name(name.into())
        .spawn(move || {
            body();
            let _ = done_tx.send(());
        })
        .map_err(|source| CoreError::Spawn { name, source })?;

    Ok(LoopHandle {
        name,
        handle,
        done_rx,
    })
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{MotorCommand, ServoCommand, SimMotorDriver, SimServoDriver};
    use gale_common::config::{MotorConfig, ServoConfig};

    fn fast_config() -> CoreConfig {
        CoreConfig {
            motor: MotorConfig { period_ms: 5 },
            servo: ServoConfig {
                period_ms: 5,
                settle_ms: 1,
                ..ServoConfig::default()
            },
            ..CoreConfig::default()
        }
    }

    #[test]
    fn shutdown_runs_both_release_sequences() {
        let store = Arc::new(StateStore::new());
        let motor = SimMotorDriver::new();
        let servo = SimServoDriver::new();

        let orch = Orchestrator::start(
            &fast_config(),
            Arc::clone(&store),
            motor.clone(),
            servo.clone(),
        )
        .unwrap();

        store.update(|s| {
            s.target_speed = 0.6;
            s.target_servo_angle = 10;
        });
        thread::sleep(Duration::from_millis(50));
        orch.shutdown();

        assert_eq!(motor.last_command(), Some(MotorCommand::Brake));
        assert_eq!(servo.commands().last(), Some(&ServoCommand::Detach));

        let snap = store.snapshot();
        assert!(snap.stop_requested);
        assert_eq!(snap.motor_speed_actual, 0);
        assert_eq!(snap.servo_angle_actual, 0);
    }

    #[test]
    fn failed_servo_init_stops_the_whole_core() {
        let store = Arc::new(StateStore::new());
        let motor = SimMotorDriver::new();
        let servo = SimServoDriver::new();
        servo.fail_next_write(); // initial neutral move rejected

        let orch = Orchestrator::start(
            &fast_config(),
            Arc::clone(&store),
            motor.clone(),
            servo.clone(),
        )
        .unwrap();

        thread::sleep(Duration::from_millis(50));
        assert!(orch.stop_requested());
        orch.shutdown();

        // Both loops ran their release sequences anyway.
        assert_eq!(motor.last_command(), Some(MotorCommand::Brake));
        assert_eq!(servo.commands().last(), Some(&ServoCommand::Detach));
    }
}
