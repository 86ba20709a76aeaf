//! # Simulation module
//!
//! Simple simulated hardware used in place of the real motor controllers and
//! camera. The plants respond to demands with a first order lag and are fully
//! deterministic.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod arm;
mod vision;
mod wheel;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use arm::{SimArm, SimArmParams};
pub use vision::SimVision;
pub use wheel::SimWheel;

use comms_if::eqpt::mech::MotorDem;
use util::maths::clamp_norm;

use crate::{arm_ctrl, data_store::DataStore, loc::Pose};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Battery voltage used to convert feedforward volts into output.
pub const NOMINAL_VOLTAGE: f64 = 12.0;

/// Free speed of the simulated motors.
///
/// Units: rotations/minute
pub const FREE_SPEED_RPM: f64 = 5676.0;

/// Current drawn at full output.
///
/// Units: amps
pub const FULL_OUTPUT_CURRENT_A: f64 = 40.0;

/// Time constant of the simulated wheels.
///
/// Units: seconds
pub const WHEEL_TIME_CONSTANT_S: f64 = 0.25;

/// The camera publishes an estimate every this many cycles.
pub const VISION_PERIOD_CYCLES: u64 = 5;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// All of the robot's simulated equipment.
pub struct SimRobot {
    pub arm: SimArm,
    pub shooter: SimWheel,
    pub intake: SimWheel,
    pub vision: SimVision,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimRobot {
    /// Create the simulated robot, with an arm matching the arm parameters,
    /// sitting at `true_pose` on the field.
    pub fn new(arm_params: &arm_ctrl::Params, true_pose: Pose) -> Self {
        Self {
            arm: SimArm::new(SimArmParams::from_arm_params(arm_params)),
            shooter: SimWheel::new(WHEEL_TIME_CONSTANT_S),
            intake: SimWheel::new(WHEEL_TIME_CONSTANT_S),
            vision: SimVision::new(true_pose, VISION_PERIOD_CYCLES),
        }
    }

    /// Read all sensors into the data store.
    pub fn sense(&self, ds: &mut DataStore) {
        ds.arm_ctrl_input.sens = self.arm.sense();
        ds.shooter.input.sens = self.shooter.sense();
        ds.intake.input.sens = self.intake.sense();
    }

    /// Apply the demands in the data store for one step of `dt_s` seconds.
    pub fn actuate(&mut self, ds: &DataStore, dt_s: f64) {
        self.arm.step(&ds.arm_ctrl_output, dt_s);
        self.shooter.step(&ds.shooter.output, dt_s);
        self.intake.step(&ds.intake.output, dt_s);
        self.vision.step(dt_s);
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// The normalised output a simulated motor controller applies for a demand.
pub(crate) fn controller_output(dem: &MotorDem, pos_rot: f64, vel_rpm: f64) -> f64 {
    let output = match *dem {
        MotorDem::Output(o) => o,
        MotorDem::Position { pos_rot: target, k_p, arb_ff_v } => {
            k_p * (target - pos_rot) + arb_ff_v / NOMINAL_VOLTAGE
        }
        MotorDem::Velocity { vel_rpm: target, k_p, arb_ff_v } => {
            k_p * (target - vel_rpm) / FREE_SPEED_RPM + arb_ff_v / NOMINAL_VOLTAGE
        }
    };

    clamp_norm(output)
}

/// Step a first order lag towards `target`.
pub(crate) fn lag(current: f64, target: f64, time_constant_s: f64, dt_s: f64) -> f64 {
    if time_constant_s <= dt_s {
        target
    }
    else {
        current + (target - current) * dt_s / time_constant_s
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_controller_output() {
        assert_eq!(controller_output(&MotorDem::Output(2.0), 0.0, 0.0), 1.0);

        let dem = MotorDem::Position { pos_rot: 10.0, k_p: 0.05, arb_ff_v: 1.2 };
        assert!((controller_output(&dem, 8.0, 0.0) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_lag() {
        assert!((lag(0.0, 1.0, 0.1, 0.02) - 0.2).abs() < 1e-12);
        assert_eq!(lag(0.0, 1.0, 0.01, 0.02), 1.0);
    }
}

/// Tests of the whole control loop running against the simulated robot.
#[cfg(test)]
mod loop_test {
    use super::*;
    use crate::{
        arm_ctrl::{test::test_params, ArmCtrl, HoldState},
        cmd::ArmTeleopParams,
        tc_processor,
        vision::VisionSource,
        CYCLE_PERIOD_S,
    };
    use comms_if::{
        eqpt::vision::Pipeline,
        tc::{wheel_ctrl::{WheelCmd, WheelId}, RobotMode, Tc},
    };

    fn setup() -> (DataStore, SimRobot) {
        let mut ds = DataStore::new(ArmTeleopParams::default());
        ds.arm_ctrl = ArmCtrl::from_params(test_params()).unwrap();
        ds.shooter.ctrl = crate::wheel_ctrl::test::shooter();

        let sim = SimRobot::new(&test_params(), Pose::new(2.0, 3.0, 90.0));

        (ds, sim)
    }

    fn run(ds: &mut DataStore, sim: &mut SimRobot, cycles: usize) {
        for _ in 0..cycles {
            ds.cycle_start(1.0 / CYCLE_PERIOD_S);
            sim.sense(ds);
            ds.run_commands(&mut sim.vision);
            ds.proc_ctrl();
            sim.actuate(ds, CYCLE_PERIOD_S);
            ds.num_cycles += 1;
        }
    }

    #[test]
    fn test_disabled_robot_is_still() {
        let (mut ds, mut sim) = setup();

        tc_processor::exec(&mut ds, &Tc::ArmInput(1.0), &mut sim.vision);
        run(&mut ds, &mut sim, 50);

        assert_eq!(ds.arm_ctrl_output.dem, comms_if::eqpt::mech::MotorDem::Output(0.0));
        assert!(sim.arm.true_position_deg() <= 0.0);
    }

    #[test]
    fn test_arm_raise_and_hold() {
        let (mut ds, mut sim) = setup();

        tc_processor::exec(&mut ds, &Tc::SetMode(RobotMode::Teleop), &mut sim.vision);
        tc_processor::exec(&mut ds, &Tc::ArmInput(0.3), &mut sim.vision);
        run(&mut ds, &mut sim, 50);

        let raised_deg = sim.arm.true_position_deg();
        assert!(raised_deg > 10.0);

        // Neutral input latches the hold
        tc_processor::exec(&mut ds, &Tc::ArmInput(0.02), &mut sim.vision);
        run(&mut ds, &mut sim, 100);

        match ds.arm_cmds.teleop.hold_state() {
            HoldState::Holding(p) => assert!((p - raised_deg).abs() < 10.0),
            s => panic!("Expected the arm to be held, got {:?}", s),
        }
        assert!(ds.arm_ctrl_status_rpt.target_position_deg.is_some());
        assert!(ds.arm_ctrl_status_rpt.homed);
    }

    #[test]
    fn test_shooter_spins_up() {
        let (mut ds, mut sim) = setup();

        tc_processor::exec(&mut ds, &Tc::SetMode(RobotMode::Teleop), &mut sim.vision);
        tc_processor::exec(
            &mut ds,
            &Tc::Wheel {
                wheel: WheelId::Shooter,
                cmd: WheelCmd::Rpm(3000.0),
            },
            &mut sim.vision,
        );
        run(&mut ds, &mut sim, 10);

        assert_eq!(ds.shooter.status_rpt.target_rpm, Some(3000.0));
        assert!(ds.shooter.status_rpt.velocity_rpm > 0.0);

        // Disabling stops the wheel
        tc_processor::exec(&mut ds, &Tc::SetMode(RobotMode::Disabled), &mut sim.vision);
        run(&mut ds, &mut sim, 1);
        assert_eq!(ds.shooter.status_rpt.target_output, Some(0.0));
        assert_eq!(ds.shooter.cmds.active(), None);
    }

    #[test]
    fn test_vision_fused() {
        let (mut ds, mut sim) = setup();

        run(&mut ds, &mut sim, 20);

        let pose = ds.loc_mgr.get_pose().unwrap();
        assert_eq!(pose.position_m.x, 2.0);
        assert!((sim.vision.robot_orientation()[0] - 90.0).abs() < 1e-9);

        // Switching pipeline stops the estimates
        tc_processor::exec(
            &mut ds,
            &Tc::Vision(comms_if::tc::VisionCmd::SetPipeline(Pipeline::Gamepiece)),
            &mut sim.vision,
        );
        run(&mut ds, &mut sim, VISION_PERIOD_CYCLES as usize);
        assert!(!ds.pose_cmd.has_pose());
        assert_eq!(sim.vision.current_pipeline(), Pipeline::Gamepiece);
    }

    #[test]
    fn test_gamepiece_tracked() {
        let (mut ds, mut sim) = setup();
        sim.vision.set_gamepiece(Some((-6.0, 1.5, 0.9)));

        // The pose pipeline doesn't see gamepieces
        run(&mut ds, &mut sim, 1);
        assert!(!ds.target_info.has_target);

        tc_processor::exec(
            &mut ds,
            &Tc::Vision(comms_if::tc::VisionCmd::SetPipeline(Pipeline::Gamepiece)),
            &mut sim.vision,
        );
        run(&mut ds, &mut sim, 1);
        assert!(ds.target_info.has_target);
        assert_eq!(ds.target_info.horizontal_offset_deg, -6.0);
        assert_eq!(ds.target_info.area_pct, 0.9);

        // Losing the target clears the offsets
        sim.vision.set_gamepiece(None);
        run(&mut ds, &mut sim, 1);
        assert_eq!(ds.target_info, crate::vision::TargetInfo::no_target());
    }
}
