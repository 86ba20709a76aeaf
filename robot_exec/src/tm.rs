//! # Telemetry
//!
//! A snapshot of the robot's state written to the session once a second, so
//! that gains, modes and the hold state can be inspected while tuning.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

use crate::{
    arm_ctrl::{self, ArmGains, HoldState},
    cmd::{ArmCmdKind, ProfileState, WheelCmdKind},
    data_store::DataStore,
    loc::Pose,
    setpoint::SetpointMode,
    vision::{PoseEstimate, TargetInfo},
    wheel_ctrl::{self, WheelGains},
};
use comms_if::{eqpt::vision::Pipeline, tc::RobotMode};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct RobotTm {
    pub time_s: f64,
    pub num_cycles: u128,
    pub robot_mode: RobotMode,
    pub arm: ArmTm,
    pub shooter: WheelTm,
    pub intake: WheelTm,
    pub vision: VisionTm,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArmTm {
    pub mode: SetpointMode,
    pub gains: ArmGains,
    pub brake_enabled: bool,
    pub status: arm_ctrl::StatusReport,
    pub cmd: Option<ArmCmdKind>,
    pub teleop_last_output: f64,
    pub hold: HoldState,
    pub tuning_enabled: bool,
    pub tuning_target_deg: f64,
    pub profile_tuning_enabled: bool,
    pub profile_next: Option<ProfileState>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WheelTm {
    pub mode: SetpointMode,
    pub gains: WheelGains,
    pub brake_enabled: bool,
    pub status: wheel_ctrl::StatusReport,
    pub cmd: Option<WheelCmdKind>,
    pub tuning_enabled: bool,
    pub tuning_setpoint_rpm: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisionTm {
    pub pipeline: Pipeline,
    pub has_pose: bool,
    pub last_estimate: Option<PoseEstimate>,
    pub target: TargetInfo,
    pub pose: Option<Pose>,
    pub num_accepted: u64,
    pub num_rejected: u64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl RobotTm {
    /// Take a snapshot of the data store.
    pub fn from_ds(ds: &DataStore, time_s: f64) -> Self {
        let cmds = &ds.arm_cmds;

        Self {
            time_s,
            num_cycles: ds.num_cycles,
            robot_mode: ds.robot_mode,
            arm: ArmTm {
                mode: ds.arm_ctrl.mode(),
                gains: ds.arm_ctrl.gains(),
                brake_enabled: ds.arm_ctrl.brake_enabled(),
                status: ds.arm_ctrl_status_rpt,
                cmd: cmds.active(),
                teleop_last_output: cmds.teleop.last_output(),
                hold: cmds.teleop.hold_state(),
                tuning_enabled: cmds.tuning.enabled(),
                tuning_target_deg: cmds.tuning.target_deg(),
                profile_tuning_enabled: cmds.profile_tuning.enabled(),
                profile_next: cmds.profile_tuning.next_state(),
            },
            shooter: WheelTm::from_wheel(&ds.shooter),
            intake: WheelTm::from_wheel(&ds.intake),
            vision: VisionTm {
                pipeline: ds.pose_cmd.pipeline(),
                has_pose: ds.pose_cmd.has_pose(),
                last_estimate: ds.pose_cmd.last_estimate(),
                target: ds.target_info,
                pose: ds.loc_mgr.get_pose(),
                num_accepted: ds.loc_mgr.num_accepted(),
                num_rejected: ds.loc_mgr.num_rejected(),
            },
        }
    }
}

impl WheelTm {
    fn from_wheel(wheel: &crate::data_store::WheelData) -> Self {
        Self {
            mode: wheel.ctrl.mode(),
            gains: wheel.ctrl.gains(),
            brake_enabled: wheel.ctrl.brake_enabled(),
            status: wheel.status_rpt,
            cmd: wheel.cmds.active(),
            tuning_enabled: wheel.cmds.tuning.enabled(),
            tuning_setpoint_rpm: wheel.cmds.tuning.setpoint_rpm(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{arm_ctrl::test::homed_arm, cmd::ArmTeleopParams};

    #[test]
    fn test_tm_json() {
        let mut ds = DataStore::new(ArmTeleopParams::default());
        ds.arm_ctrl = homed_arm();
        ds.arm_ctrl.set_target_position(45.0);
        ds.num_cycles = 50;

        let tm = RobotTm::from_ds(&ds, 1.0);
        let json = serde_json::to_value(&tm).unwrap();

        assert_eq!(json["num_cycles"], 50);
        assert_eq!(json["robot_mode"], "Disabled");
        assert_eq!(json["arm"]["gains"]["k_p"], 0.018);
        assert!(json["arm"]["mode"]["ClosedLoop"].is_object());
        assert!(json["vision"]["pose"].is_null());
        assert_eq!(json["vision"]["target"]["has_target"], false);
        assert_eq!(json["shooter"]["cmd"], serde_json::Value::Null);
    }
}
