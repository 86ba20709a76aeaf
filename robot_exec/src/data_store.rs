//! # Data Store

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::{
    eqpt::mech::MotorDems,
    tc::{wheel_ctrl::WheelId, RobotMode},
};
use log::{info, warn};

use crate::{
    arm_ctrl,
    cmd::{ArmCmds, ArmTeleopParams, WheelCmds},
    loc::LocMgr,
    vision::{orientation_array, PoseEstimateCmd, TargetInfo, VisionSource},
    wheel_ctrl,
};
use util::{archive::Archived, module::State};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    /// Current operating mode of the robot.
    pub robot_mode: RobotMode,

    // ArmCtrl
    pub arm_ctrl: arm_ctrl::ArmCtrl,
    pub arm_ctrl_input: arm_ctrl::InputData,
    pub arm_ctrl_output: MotorDems,
    pub arm_ctrl_status_rpt: arm_ctrl::StatusReport,
    pub arm_cmds: ArmCmds,

    // WheelCtrl
    pub shooter: WheelData,
    pub intake: WheelData,

    // Vision and localisation
    pub pose_cmd: PoseEstimateCmd,
    pub pose_cmd_active: bool,
    pub loc_mgr: LocMgr,
    pub target_info: TargetInfo,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,
}

/// Everything held for one wheel.
pub struct WheelData {
    pub ctrl: wheel_ctrl::WheelCtrl,
    pub input: wheel_ctrl::InputData,
    pub output: MotorDems,
    pub status_rpt: wheel_ctrl::StatusReport,
    pub cmds: WheelCmds,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl WheelData {
    pub fn new(id: WheelId) -> Self {
        Self {
            ctrl: wheel_ctrl::WheelCtrl::new(id),
            input: wheel_ctrl::InputData::default(),
            output: MotorDems::default(),
            status_rpt: wheel_ctrl::StatusReport::default(),
            cmds: WheelCmds::default(),
        }
    }

    fn proc(&mut self) {
        match self.ctrl.proc(&self.input) {
            Ok((o, r)) => {
                self.output = o;
                self.status_rpt = r;
            }
            Err(e) => match e {},
        }
    }
}

impl DataStore {
    pub fn new(arm_teleop_params: ArmTeleopParams) -> Self {
        Self {
            num_cycles: 0,
            is_1_hz_cycle: false,
            robot_mode: RobotMode::default(),
            arm_ctrl: arm_ctrl::ArmCtrl::default(),
            arm_ctrl_input: arm_ctrl::InputData::default(),
            arm_ctrl_output: MotorDems::default(),
            arm_ctrl_status_rpt: arm_ctrl::StatusReport::default(),
            arm_cmds: ArmCmds::new(arm_teleop_params),
            shooter: WheelData::new(WheelId::Shooter),
            intake: WheelData::new(WheelId::Intake),
            pose_cmd: PoseEstimateCmd::default(),
            pose_cmd_active: false,
            loc_mgr: LocMgr::new(),
            target_info: TargetInfo::no_target(),
            num_consec_cycle_overruns: 0,
        }
    }

    pub fn wheel_mut(&mut self, id: WheelId) -> &mut WheelData {
        match id {
            WheelId::Shooter => &mut self.shooter,
            WheelId::Intake => &mut self.intake,
        }
    }

    pub fn wheel(&self, id: WheelId) -> &WheelData {
        match id {
            WheelId::Shooter => &self.shooter,
            WheelId::Intake => &self.intake,
        }
    }

    /// Change the operating mode of the robot.
    ///
    /// Disabling ends all running commands.
    pub fn set_mode(&mut self, mode: RobotMode) {
        if mode == self.robot_mode {
            return;
        }

        info!("Robot mode {:?} -> {:?}", self.robot_mode, mode);
        self.robot_mode = mode;

        if mode == RobotMode::Disabled {
            self.make_safe();
        }
    }

    /// Bring all actuators to zero output, ending any running commands.
    pub fn make_safe(&mut self) {
        self.arm_cmds.cancel(&mut self.arm_ctrl);
        self.arm_ctrl.make_safe();

        for id in WheelId::ALL.iter() {
            let wheel = self.wheel_mut(*id);
            wheel.cmds.cancel(&mut wheel.ctrl);
            wheel.ctrl.make_safe();
        }
    }

    /// Perform actions required at the start of a cycle.
    ///
    /// Clears those items that need clearing at the start of a cycle, and sets the 1Hz cycle flag.
    pub fn cycle_start(&mut self, cycle_frequency_hz: f64) {
        self.is_1_hz_cycle = self.num_cycles % (cycle_frequency_hz as u128) == 0;

        self.arm_ctrl_input = arm_ctrl::InputData::default();
        self.arm_ctrl_output = MotorDems::default();
        self.arm_ctrl_status_rpt = arm_ctrl::StatusReport::default();

        for id in WheelId::ALL.iter() {
            let wheel = self.wheel_mut(*id);
            wheel.input = wheel_ctrl::InputData::default();
            wheel.output = MotorDems::default();
            wheel.status_rpt = wheel_ctrl::StatusReport::default();
        }
    }

    /// Run the active commands for this cycle.
    pub fn run_commands(&mut self, vision: &mut dyn VisionSource) {
        if self.robot_mode == RobotMode::Disabled {
            self.make_safe();
        }
        else {
            self.arm_cmds.execute(&mut self.arm_ctrl);

            for id in WheelId::ALL.iter() {
                let wheel = self.wheel_mut(*id);
                wheel.cmds.execute(&mut wheel.ctrl);
            }
        }

        // Pose estimation has no actuators so runs in every mode
        if !self.pose_cmd_active {
            self.pose_cmd.initialize(vision);
            self.pose_cmd_active = true;
        }
        self.pose_cmd.execute(vision, &mut self.loc_mgr);

        self.target_info = TargetInfo::from_readings(&vision.target_readings());

        if let Some(pose) = self.loc_mgr.get_pose() {
            vision.set_robot_orientation(orientation_array(pose.get_heading_deg()));
        }
    }

    /// Run the controllers on this cycle's sensor data.
    pub fn proc_ctrl(&mut self) {
        match self.arm_ctrl.proc(&self.arm_ctrl_input) {
            Ok((o, r)) => {
                self.arm_ctrl_output = o;
                self.arm_ctrl_status_rpt = r;
            }
            Err(e) => match e {},
        }

        self.shooter.proc();
        self.intake.proc();
    }

    /// Write the controller archives.
    pub fn write_archives(&mut self) {
        if let Err(e) = self.arm_ctrl.write() {
            warn!("Could not write ArmCtrl archive: {}", e);
        }

        for id in WheelId::ALL.iter() {
            if let Err(e) = self.wheel_mut(*id).ctrl.write() {
                warn!("Could not write {} archive: {}", id.as_str(), e);
            }
        }
    }

    /// End the commands which are running, called before shutdown.
    pub fn shutdown(&mut self) {
        self.make_safe();

        if self.pose_cmd_active {
            self.pose_cmd.end();
            self.pose_cmd_active = false;
        }
    }
}
