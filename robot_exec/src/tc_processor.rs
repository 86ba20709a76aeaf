//! # Telecommand processor module
//!
//! The telecommand processor handles various TCs coming from any source.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, warn};

// Internal
use crate::{
    cmd::{ArmCmdKind, ProfileConstraints, WheelCmdKind},
    data_store::DataStore,
    vision::VisionSource,
};
use comms_if::tc::{
    arm_ctrl::ArmCmd,
    wheel_ctrl::{WheelCmd, WheelId},
    Tc, VisionCmd,
};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Execute a telecommand.
///
/// Mutates the datastore to send commands to different modules.
pub fn exec(ds: &mut DataStore, tc: &Tc, vision: &mut dyn VisionSource) {
    // Handle different Tcs
    match tc {
        Tc::SetMode(mode) => ds.set_mode(*mode),
        Tc::ArmInput(value) => ds.arm_cmds.teleop.set_input(*value),
        Tc::WheelInput { wheel, value } => ds.wheel_mut(*wheel).cmds.teleop.set_input(*value),
        Tc::Arm(cmd) => exec_arm(ds, cmd),
        Tc::Wheel { wheel, cmd } => exec_wheel(ds, *wheel, cmd),
        Tc::Vision(VisionCmd::SetPipeline(p)) => ds.pose_cmd.set_pipeline(*p, vision),
        Tc::Vision(VisionCmd::Log(log)) => ds.pose_cmd.set_log(*log),
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn exec_arm(ds: &mut DataStore, cmd: &ArmCmd) {
    let mode = ds.robot_mode;

    match *cmd {
        ArmCmd::Teleop => ds.arm_cmds.select(ArmCmdKind::Teleop, &mut ds.arm_ctrl),
        ArmCmd::Tuning => ds.arm_cmds.select(ArmCmdKind::Tuning, &mut ds.arm_ctrl),
        ArmCmd::ProfileTuning => {
            ds.arm_cmds.select(ArmCmdKind::ProfileTuning, &mut ds.arm_ctrl)
        }
        ArmCmd::TuningEnable(enabled) => match ds.arm_cmds.selected() {
            ArmCmdKind::Tuning => ds.arm_cmds.tuning.set_enabled(enabled, mode),
            ArmCmdKind::ProfileTuning => ds.arm_cmds.profile_tuning.set_enabled(enabled, mode),
            ArmCmdKind::Teleop => debug!("Arm tuning enable ignored, no tuning command selected"),
        },
        ArmCmd::TuningSetpoint {
            position_deg,
            velocity_degs,
        } => {
            ds.arm_cmds.tuning.set_setpoint(position_deg, velocity_degs);
            ds.arm_cmds.profile_tuning.set_setpoint(position_deg);
        }
        ArmCmd::ProfileConstraints {
            max_velocity_degs,
            max_acceleration_degss,
        } => {
            if max_velocity_degs > 0.0 && max_acceleration_degss > 0.0 {
                ds.arm_cmds.profile_tuning.set_constraints(ProfileConstraints {
                    max_velocity: max_velocity_degs,
                    max_acceleration: max_acceleration_degss,
                });
            }
            else {
                warn!(
                    "Ignoring non-positive profile constraints ({}, {})",
                    max_velocity_degs, max_acceleration_degss
                );
            }
        }
        ArmCmd::Gains { k_p, k_g, k_v } => {
            if let Some(k_p) = k_p {
                ds.arm_ctrl.set_k_p(k_p);
            }
            if let Some(k_g) = k_g {
                ds.arm_ctrl.set_k_g(k_g);
            }
            if let Some(k_v) = k_v {
                ds.arm_ctrl.set_k_v(k_v);
            }
        }
        ArmCmd::Brake(enabled) => ds.arm_ctrl.set_brake_enabled(enabled),
    }
}

fn exec_wheel(ds: &mut DataStore, id: WheelId, cmd: &WheelCmd) {
    let mode = ds.robot_mode;
    let wheel = ds.wheel_mut(id);

    match *cmd {
        WheelCmd::Stop => wheel.cmds.select(WheelCmdKind::Stop, &mut wheel.ctrl),
        WheelCmd::Teleop => wheel.cmds.select(WheelCmdKind::Teleop, &mut wheel.ctrl),
        WheelCmd::Rpm(rpm) => {
            wheel.cmds.rpm.rpm = rpm;
            wheel.cmds.select(WheelCmdKind::Rpm, &mut wheel.ctrl);
        }
        WheelCmd::Tuning => wheel.cmds.select(WheelCmdKind::Tuning, &mut wheel.ctrl),
        WheelCmd::TuningEnable(enabled) => wheel.cmds.tuning.set_enabled(enabled, mode),
        WheelCmd::TuningSetpoint(rpm) => wheel.cmds.tuning.set_setpoint_rpm(rpm),
        WheelCmd::Gains { k_p, k_v } => {
            if let Some(k_p) = k_p {
                wheel.ctrl.set_k_p(k_p);
            }
            if let Some(k_v) = k_v {
                wheel.ctrl.set_k_v(k_v);
            }
        }
        WheelCmd::Brake(enabled) => wheel.ctrl.set_brake_enabled(enabled),
    }
}
