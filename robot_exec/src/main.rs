//! Main robot-side executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Actuator sensing
//!         - Telecommand processing and handling
//!         - Command execution (teleop, tuning, pose estimation)
//!         - Arm and wheel control processing
//!         - Actuation
//!         - Archiving and telemetry
//!
//! # Modules
//!
//! All control modules (e.g. `arm_ctrl`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.
//!

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use structopt::StructOpt;

// Internal
use robot_lib::{
    cmd::ArmTeleopParams,
    data_store::DataStore,
    loc::Pose,
    sim::SimRobot,
    tc_processor,
    tm::RobotTm,
    CYCLE_FREQUENCY_HZ, CYCLE_PERIOD_S,
};
use util::{
    host,
    logger::{logger_init, LevelFilter},
    module::State,
    script_interpreter::{PendingTcs, ScriptInterpreter},
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of consecutive overruns after which a warning is escalated.
const MAX_CONSEC_CYCLE_OVERRUNS: u64 = 50;

/// Modules whose setpoint changes are logged every cycle during teleop, kept
/// at info unless `--verbose-ctrl` is given.
const QUIET_CTRL_MODULES: [(&str, LevelFilter); 2] = [
    ("robot_lib::arm_ctrl::state", LevelFilter::Info),
    ("robot_lib::wheel_ctrl::state", LevelFilter::Info),
];

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Command line options for the executable.
#[derive(Debug, StructOpt)]
#[structopt(name = "robot_exec", about = "Arm and wheel controller for the robot")]
struct Opts {
    /// Path to the TC script to execute
    #[structopt(parse(from_os_str))]
    script: PathBuf,

    /// Stop after this many cycles, even if the script has not finished
    #[structopt(long)]
    max_cycles: Option<u128>,

    /// Run cycles back to back instead of in real time
    #[structopt(long)]
    no_sleep: bool,

    /// Log every arm and wheel setpoint change at debug level
    #[structopt(long)]
    verbose_ctrl: bool,

    /// Initial field x position of the simulated robot, in meters
    #[structopt(long, default_value = "0")]
    start_x_m: f64,

    /// Initial field y position of the simulated robot, in meters
    #[structopt(long, default_value = "0")]
    start_y_m: f64,

    /// Initial heading of the simulated robot
    #[structopt(long, default_value = "0")]
    start_heading_deg: f64,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opts = Opts::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("robot_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    let module_levels: &[(&str, LevelFilter)] = if opts.verbose_ctrl {
        &[]
    }
    else {
        &QUIET_CTRL_MODULES
    };
    logger_init(LevelFilter::Debug, module_levels, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Robot Executable\n");
    info!("Running on: {}", host::get_hostname());
    info!("Session directory: {:?}\n", session.session_root);

    debug!("CLI options: {:?}", opts);

    // ---- LOAD PARAMETERS ----

    let arm_teleop_params: ArmTeleopParams =
        util::params::load("arm_teleop.toml").wrap_err("Could not load arm teleop params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE TC SOURCE ----

    info!("Loading script from {:?}", opts.script);

    let mut si = ScriptInterpreter::new(&opts.script).wrap_err("Failed to load script")?;

    info!(
        "Loaded script lasts {:.02} s and contains {} TCs\n",
        si.get_duration(),
        si.get_num_tcs()
    );

    // ---- INITIALISE DATASTORE ----

    info!("Initialising modules...");

    let mut ds = DataStore::new(arm_teleop_params);

    // ---- INITIALISE MODULES ----

    ds.arm_ctrl
        .init("arm_ctrl.toml", Some(&session))
        .wrap_err("Failed to initialise ArmCtrl")?;
    info!("ArmCtrl init complete");

    ds.shooter
        .ctrl
        .init("shooter.toml", Some(&session))
        .wrap_err("Failed to initialise the shooter WheelCtrl")?;
    info!("Shooter WheelCtrl init complete");

    ds.intake
        .ctrl
        .init("intake.toml", Some(&session))
        .wrap_err("Failed to initialise the intake WheelCtrl")?;
    info!("Intake WheelCtrl init complete");

    info!("Module initialisation complete\n");

    // ---- INITIALISE SIMULATION ----

    let start_pose = Pose::new(opts.start_x_m, opts.start_y_m, opts.start_heading_deg);
    let mut sim = SimRobot::new(ds.arm_ctrl.params(), start_pose);

    info!("Simulated robot initialised at {:?}", start_pose);

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Scripts are timed against the cycle count so runs are repeatable
        let time_s = ds.num_cycles as f64 * CYCLE_PERIOD_S;

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start(CYCLE_FREQUENCY_HZ);

        // ---- DATA INPUT ----

        sim.sense(&mut ds);

        // ---- TELECOMMAND PROCESSING ----

        match si.get_pending_tcs_at(time_s) {
            PendingTcs::None => (),
            PendingTcs::Some(tc_vec) => {
                for tc in tc_vec.iter() {
                    debug!("Executing TC: {:?}", tc);
                    tc_processor::exec(&mut ds, tc, &mut sim.vision);
                }
            }
            // Exit if end of script reached
            PendingTcs::EndOfScript => {
                info!("End of TC script reached, stopping");
                break;
            }
        }

        // ---- COMMANDS ----

        ds.run_commands(&mut sim.vision);

        // ---- CONTROL ALGORITHM PROCESSING ----

        ds.proc_ctrl();

        // ---- ACTUATION ----

        sim.actuate(&ds, CYCLE_PERIOD_S);

        // ---- WRITE ARCHIVES ----

        ds.write_archives();

        // ---- TELEMETRY ----

        if ds.is_1_hz_cycle {
            session.save("tm/robot_tm.json", RobotTm::from_ds(&ds, time_s));
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match Duration::from_secs_f64(CYCLE_PERIOD_S).checked_sub(cycle_dur) {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                if !opts.no_sleep {
                    thread::sleep(d);
                }
            }
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - CYCLE_PERIOD_S
                );
                ds.num_consec_cycle_overruns += 1;

                if ds.num_consec_cycle_overruns == MAX_CONSEC_CYCLE_OVERRUNS {
                    warn!(
                        "{} consecutive cycle overruns, the loop cannot keep up",
                        MAX_CONSEC_CYCLE_OVERRUNS
                    );
                }
            }
        }

        // Increment cycle counter
        ds.num_cycles += 1;

        if let Some(max) = opts.max_cycles {
            if ds.num_cycles >= max {
                info!("Maximum of {} cycles reached, stopping", max);
                break;
            }
        }
    }

    // ---- SHUTDOWN ----

    ds.shutdown();
    session.save(
        "tm/robot_tm.json",
        RobotTm::from_ds(&ds, ds.num_cycles as f64 * CYCLE_PERIOD_S),
    );

    info!("End of execution");

    session.exit();

    Ok(())
}
