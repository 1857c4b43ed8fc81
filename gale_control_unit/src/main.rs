//! # GALE Control Unit
//!
//! Actuation-and-fusion core for a gesture-controlled fan.
//!
//! Without camera hardware attached this binary runs the full core
//! against simulation drivers: the actuator loops spin at their
//! configured periods while a scripted detection feed (or a simulated
//! potentiometer ramp, depending on `input_mode`) exercises the fusion
//! path. Ctrl-C triggers the safe-shutdown handshake: motor braked,
//! servo returned to neutral and detached.

use clap::Parser;
use gale_common::config::{CoreConfig, InputMode, load_config};
use gale_common::driver::AnalogInput;
use gale_common::observation::{Observation, SignLabel};
use gale_control_unit::detection::DetectionCycle;
use gale_control_unit::orchestrator::Orchestrator;
use gale_control_unit::sim::{SimAnalogInput, SimMotorDriver, SimServoDriver};
use gale_control_unit::store::StateStore;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

/// GALE Control Unit — concurrent fan actuation core
#[derive(Parser, Debug)]
#[command(name = "gale_control_unit")]
#[command(version)]
#[command(about = "Actuation & fusion core for a gesture-controlled fan")]
struct Args {
    /// Path to configuration TOML. A missing file falls back to the
    /// stock tuning.
    #[arg(default_value = "config/gale.toml")]
    config: PathBuf,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    setup_tracing(&args);

    info!("GALE Control Unit v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("GALE Control Unit shutdown complete");
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = if args.config.exists() {
        load_config(&args.config)?
    } else {
        warn!(
            "config file {} not found; using defaults",
            args.config.display()
        );
        CoreConfig::default()
    };

    info!(
        "Config OK: mode={:?}, motor period={}ms, servo period={}ms, range=[{}, {}]",
        config.input_mode,
        config.motor.period_ms,
        config.servo.period_ms,
        config.servo.min_angle,
        config.servo.max_angle,
    );

    let store = Arc::new(StateStore::new());
    let orchestrator = Orchestrator::start(
        &config,
        Arc::clone(&store),
        SimMotorDriver::new(),
        SimServoDriver::new(),
    )?;

    let ctrlc_store = Arc::clone(&store);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        ctrlc_store.request_stop();
    })?;

    let mut detection = DetectionCycle::new(Arc::clone(&store), &config);
    match config.input_mode {
        InputMode::Gesture => run_gesture_demo(&store, &mut detection),
        InputMode::Potentiometer => run_potentiometer_demo(&store, &mut detection),
    }

    orchestrator.shutdown();
    Ok(())
}

/// Scripted classifier feed covering the fusion tiers, a disagreement,
/// jog gestures, a no-hand hold, and a presence interlock event.
const GESTURE_SCRIPT: [(Observation, Observation, bool); 8] = [
    (
        Observation::Sign {
            label: SignLabel::V,
            confidence: 0.92,
        },
        Observation::FingerCount { count: 2 },
        false,
    ),
    (
        Observation::Sign {
            label: SignLabel::W,
            confidence: 0.88,
        },
        Observation::FingerCount { count: 1 },
        false,
    ),
    (
        Observation::Sign {
            label: SignLabel::T,
            confidence: 0.80,
        },
        Observation::Absent,
        false,
    ),
    (Observation::Absent, Observation::Absent, false),
    (Observation::Absent, Observation::FingerCount { count: 1 }, false),
    (
        Observation::Sign {
            label: SignLabel::W,
            confidence: 0.95,
        },
        Observation::FingerCount { count: 3 },
        true, // person steps into frame mid-gesture
    ),
    (Observation::Absent, Observation::FingerCount { count: 5 }, false),
    (
        Observation::Sign {
            label: SignLabel::S,
            confidence: 0.90,
        },
        Observation::FingerCount { count: 0 },
        false,
    ),
];

fn run_gesture_demo(store: &Arc<StateStore>, detection: &mut DetectionCycle) {
    info!("gesture demo feed running (Ctrl-C to stop)");
    let mut step = 0usize;
    while !store.stop_requested() {
        let (primary, secondary, presence) = GESTURE_SCRIPT[step % GESTURE_SCRIPT.len()];
        detection.submit(primary, secondary, presence);
        step += 1;

        if step % GESTURE_SCRIPT.len() == 0 {
            let snap = store.snapshot();
            info!(
                "telemetry: motor={}% servo={}° tier={:?} fingers={:?} presence={}",
                snap.motor_speed_actual,
                snap.servo_angle_actual,
                snap.tier,
                snap.finger_count,
                snap.presence,
            );
        }
        thread::sleep(Duration::from_millis(200));
    }
}

fn run_potentiometer_demo(store: &Arc<StateStore>, detection: &mut DetectionCycle) {
    info!("potentiometer demo ramp running (Ctrl-C to stop)");
    let input = SimAnalogInput::new(0.0);
    let mut handle = input.clone();
    let mut step = 0u32;
    while !store.stop_requested() {
        // Triangle ramp 0 V → 3.3 V → 0 V.
        let phase = (step % 66) as f64;
        let volts = if phase <= 33.0 { phase } else { 66.0 - phase } * 0.1;
        input.set_volts(volts);

        match handle.read_volts() {
            Ok(v) => detection.submit_voltage(v, false),
            Err(e) => warn!("analog read failed: {e}"),
        }

        if step % 10 == 0 {
            let snap = store.snapshot();
            info!(
                "telemetry: {:.2}V -> motor={}%",
                snap.voltage, snap.motor_speed_actual
            );
        }
        step += 1;
        thread::sleep(Duration::from_millis(200));
    }
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
