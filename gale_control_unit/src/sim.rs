//! Simulation drivers.
//!
//! Software-emulated motor/servo/analog drivers for development,
//! tests, and bench runs without physical hardware. Each driver
//! records its full command stream behind a shared handle, and can be
//! told to reject the next write to exercise the recovery paths.

use gale_common::driver::{AnalogInput, DriverError, MotorDriver, ServoDriver};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// One recorded motor command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotorCommand {
    /// Proportional forward drive at the given fraction.
    Forward(f64),
    /// Active brake.
    Brake,
}

/// One recorded servo command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServoCommand {
    /// Absolute angle applied [deg].
    SetAngle(i32),
    /// Drive signal released.
    Detach,
}

#[derive(Debug)]
struct Recorder<C> {
    commands: Mutex<Vec<C>>,
    fail_next: AtomicBool,
}

impl<C> Default for Recorder<C> {
    fn default() -> Self {
        Self {
            commands: Mutex::new(Vec::new()),
            fail_next: AtomicBool::new(false),
        }
    }
}

impl<C: Clone> Recorder<C> {
    fn record(&self, cmd: C, what: &str) -> Result<(), DriverError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(DriverError::WriteFailed(format!("simulated {what} fault")));
        }
        self.commands.lock().push(cmd);
        Ok(())
    }
}

/// Recording simulation motor driver. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct SimMotorDriver {
    shared: Arc<Recorder<MotorCommand>>,
}

impl SimMotorDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full command stream so far.
    pub fn commands(&self) -> Vec<MotorCommand> {
        self.shared.commands.lock().clone()
    }

    /// Most recent command, if any.
    pub fn last_command(&self) -> Option<MotorCommand> {
        self.shared.commands.lock().last().copied()
    }

    /// Reject the next write with a simulated hardware fault.
    pub fn fail_next_write(&self) {
        self.shared.fail_next.store(true, Ordering::SeqCst);
    }
}

impl MotorDriver for SimMotorDriver {
    fn forward(&mut self, speed: f64) -> Result<(), DriverError> {
        self.shared.record(MotorCommand::Forward(speed), "motor")
    }

    fn brake(&mut self) -> Result<(), DriverError> {
        self.shared.record(MotorCommand::Brake, "motor")
    }
}

/// Recording simulation servo driver. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct SimServoDriver {
    shared: Arc<Recorder<ServoCommand>>,
}

impl SimServoDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full command stream so far.
    pub fn commands(&self) -> Vec<ServoCommand> {
        self.shared.commands.lock().clone()
    }

    /// Last angle applied, if any angle was ever applied.
    pub fn angle(&self) -> Option<i32> {
        self.shared
            .commands
            .lock()
            .iter()
            .rev()
            .find_map(|c| match c {
                ServoCommand::SetAngle(a) => Some(*a),
                ServoCommand::Detach => None,
            })
    }

    /// Reject the next write with a simulated hardware fault.
    pub fn fail_next_write(&self) {
        self.shared.fail_next.store(true, Ordering::SeqCst);
    }
}

impl ServoDriver for SimServoDriver {
    fn set_angle(&mut self, degrees: i32) -> Result<(), DriverError> {
        self.shared.record(ServoCommand::SetAngle(degrees), "servo")
    }

    fn detach(&mut self) -> Result<(), DriverError> {
        self.shared.record(ServoCommand::Detach, "servo")
    }
}

/// Settable simulation analog input for the potentiometer mode.
#[derive(Debug, Clone, Default)]
pub struct SimAnalogInput {
    volts: Arc<Mutex<f64>>,
}

impl SimAnalogInput {
    pub fn new(initial_volts: f64) -> Self {
        Self {
            volts: Arc::new(Mutex::new(initial_volts)),
        }
    }

    /// Set the voltage the next read will return.
    pub fn set_volts(&self, volts: f64) {
        *self.volts.lock() = volts;
    }
}

impl AnalogInput for SimAnalogInput {
    fn read_volts(&mut self) -> Result<f64, DriverError> {
        Ok(*self.volts.lock())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motor_driver_records_commands() {
        let driver = SimMotorDriver::new();
        let mut handle = driver.clone();
        handle.forward(0.6).unwrap();
        handle.brake().unwrap();
        assert_eq!(
            driver.commands(),
            vec![MotorCommand::Forward(0.6), MotorCommand::Brake]
        );
    }

    #[test]
    fn fail_next_write_rejects_once() {
        let driver = SimMotorDriver::new();
        let mut handle = driver.clone();
        driver.fail_next_write();
        assert!(handle.forward(0.3).is_err());
        assert!(handle.forward(0.3).is_ok());
        assert_eq!(driver.commands().len(), 1);
    }

    #[test]
    fn servo_angle_reports_last_applied() {
        let driver = SimServoDriver::new();
        let mut handle = driver.clone();
        assert_eq!(driver.angle(), None);
        handle.set_angle(10).unwrap();
        handle.set_angle(-5).unwrap();
        handle.detach().unwrap();
        assert_eq!(driver.angle(), Some(-5));
    }

    #[test]
    fn analog_input_round_trips() {
        let input = SimAnalogInput::new(1.2);
        let mut handle = input.clone();
        assert_eq!(handle.read_volts().unwrap(), 1.2);
        input.set_volts(2.4);
        assert_eq!(handle.read_volts().unwrap(), 2.4);
    }
}
