//! # Commands
//!
//! Commands decide what a controller shall do each cycle. Each controller has
//! a selection of commands, exactly one of which runs at a time. A command is
//! initialised the first cycle it runs, executed every cycle it is active,
//! and ended when it is replaced or the robot is disabled.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod arm_profile_tuning;
mod arm_teleop;
mod arm_tuning;
mod wheel_teleop;
mod wheel_tuning;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::debug;
use serde::Serialize;

pub use arm_profile_tuning::*;
pub use arm_teleop::*;
pub use arm_tuning::*;
pub use wheel_teleop::*;
pub use wheel_tuning::*;

use crate::{arm_ctrl::ArmCtrl, wheel_ctrl::WheelCtrl};

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A command acting on a single subsystem.
pub trait Command {
    type Subsystem;

    /// Called on the first cycle the command runs.
    fn initialize(&mut self, _subsystem: &mut Self::Subsystem) {}

    /// Called every cycle the command is active.
    fn execute(&mut self, subsystem: &mut Self::Subsystem);

    /// Called when the command is replaced or interrupted.
    fn end(&mut self, _subsystem: &mut Self::Subsystem) {}
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum ArmCmdKind {
    Teleop,
    Tuning,
    ProfileTuning,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum WheelCmdKind {
    Stop,
    Teleop,
    Rpm,
    Tuning,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The commands available to the arm.
pub struct ArmCmds {
    pub teleop: ArmTeleop,
    pub tuning: ArmTuning,
    pub profile_tuning: ArmProfileTuning,

    selected: ArmCmdKind,
    active: Option<ArmCmdKind>,
}

/// The commands available to a wheel.
#[derive(Default)]
pub struct WheelCmds {
    pub stop: WheelStop,
    pub teleop: WheelTeleop,
    pub rpm: WheelRpm,
    pub tuning: WheelTuning,

    selected: WheelCmdKind,
    active: Option<WheelCmdKind>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for WheelCmdKind {
    fn default() -> Self {
        WheelCmdKind::Stop
    }
}

impl ArmCmds {
    /// Create the arm commands, with teleop selected.
    pub fn new(teleop_params: ArmTeleopParams) -> Self {
        Self {
            teleop: ArmTeleop::new(teleop_params),
            tuning: ArmTuning::default(),
            profile_tuning: ArmProfileTuning::default(),
            selected: ArmCmdKind::Teleop,
            active: None,
        }
    }

    pub fn selected(&self) -> ArmCmdKind {
        self.selected
    }

    pub fn active(&self) -> Option<ArmCmdKind> {
        self.active
    }

    /// Select the command to run, ending the active command if it differs.
    pub fn select(&mut self, kind: ArmCmdKind, arm: &mut ArmCtrl) {
        if kind == self.selected {
            return;
        }

        debug!("Arm command {:?} -> {:?}", self.selected, kind);
        self.selected = kind;
        self.cancel(arm);
    }

    /// Run the selected command for this cycle.
    pub fn execute(&mut self, arm: &mut ArmCtrl) {
        let kind = self.selected;

        if self.active.is_none() {
            self.active = Some(kind);
            self.cmd_mut(kind).initialize(arm);
        }

        self.cmd_mut(kind).execute(arm);
    }

    /// End the active command, if there is one.
    pub fn cancel(&mut self, arm: &mut ArmCtrl) {
        if let Some(kind) = self.active.take() {
            self.cmd_mut(kind).end(arm);
        }
    }

    fn cmd_mut(&mut self, kind: ArmCmdKind) -> &mut dyn Command<Subsystem = ArmCtrl> {
        match kind {
            ArmCmdKind::Teleop => &mut self.teleop,
            ArmCmdKind::Tuning => &mut self.tuning,
            ArmCmdKind::ProfileTuning => &mut self.profile_tuning,
        }
    }
}

impl WheelCmds {
    pub fn selected(&self) -> WheelCmdKind {
        self.selected
    }

    pub fn active(&self) -> Option<WheelCmdKind> {
        self.active
    }

    /// Select the command to run, ending the active command if it differs.
    pub fn select(&mut self, kind: WheelCmdKind, wheel: &mut WheelCtrl) {
        if kind == self.selected {
            return;
        }

        debug!("{} command {:?} -> {:?}", wheel.id().as_str(), self.selected, kind);
        self.selected = kind;
        self.cancel(wheel);
    }

    /// Run the selected command for this cycle.
    pub fn execute(&mut self, wheel: &mut WheelCtrl) {
        let kind = self.selected;

        if self.active.is_none() {
            self.active = Some(kind);
            self.cmd_mut(kind).initialize(wheel);
        }

        self.cmd_mut(kind).execute(wheel);
    }

    /// End the active command, if there is one.
    pub fn cancel(&mut self, wheel: &mut WheelCtrl) {
        if let Some(kind) = self.active.take() {
            self.cmd_mut(kind).end(wheel);
        }
    }

    fn cmd_mut(&mut self, kind: WheelCmdKind) -> &mut dyn Command<Subsystem = WheelCtrl> {
        match kind {
            WheelCmdKind::Stop => &mut self.stop,
            WheelCmdKind::Teleop => &mut self.teleop,
            WheelCmdKind::Rpm => &mut self.rpm,
            WheelCmdKind::Tuning => &mut self.tuning,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::arm_ctrl::test::{homed_arm, sens_at};
    use crate::setpoint::SetpointMode;
    use crate::wheel_ctrl::test::shooter;
    use comms_if::tc::RobotMode;
    use util::module::State;

    #[test]
    fn test_arm_cmd_switch() {
        let mut arm = homed_arm();
        let mut cmds = ArmCmds::new(ArmTeleopParams::default());
        assert_eq!(cmds.active(), None);

        arm.proc(&sens_at(50.0)).unwrap();
        cmds.teleop.set_input(0.5);
        cmds.execute(&mut arm);
        assert_eq!(cmds.active(), Some(ArmCmdKind::Teleop));
        assert_eq!(arm.mode(), SetpointMode::RawOutput(0.5));

        // Switching ends teleop, which holds the raised arm
        cmds.select(ArmCmdKind::Tuning, &mut arm);
        assert_eq!(cmds.active(), None);
        assert_eq!(arm.mode().target_position(), Some(50.0));

        // Disabled tuning command zeroes the output
        cmds.execute(&mut arm);
        assert_eq!(cmds.active(), Some(ArmCmdKind::Tuning));
        assert_eq!(arm.mode(), SetpointMode::RawOutput(0.0));

        cmds.tuning.set_enabled(true, RobotMode::Teleop);
        cmds.execute(&mut arm);
        assert_eq!(arm.mode().target_position(), Some(DEFAULT_TUNING_SETPOINT_DEG));
    }

    #[test]
    fn test_wheel_cmd_switch() {
        let mut wheel = shooter();
        let mut cmds = WheelCmds::default();

        cmds.execute(&mut wheel);
        assert_eq!(cmds.active(), Some(WheelCmdKind::Stop));

        cmds.rpm.rpm = 1500.0;
        cmds.select(WheelCmdKind::Rpm, &mut wheel);
        cmds.execute(&mut wheel);
        assert_eq!(wheel.mode().target_velocity(), Some(1500.0));

        cmds.cancel(&mut wheel);
        assert_eq!(cmds.active(), None);
    }
}
