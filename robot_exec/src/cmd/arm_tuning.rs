//! Closed loop tuning of the arm.
//!
//! While enabled the arm tracks a setpoint which moves at the setpoint
//! velocity, so the gravity and velocity feedforward gains can be tuned.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::debug;

use super::Command;
use crate::{arm_ctrl::ArmCtrl, CYCLE_PERIOD_S};
use comms_if::tc::RobotMode;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Units: degrees
pub const DEFAULT_TUNING_SETPOINT_DEG: f64 = 40.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ArmTuning {
    enabled: bool,

    /// Units: degrees
    setpoint_deg: f64,

    /// Units: degrees/second
    setpoint_velocity_degs: f64,

    /// The moving target, reset to the setpoint on enable.
    ///
    /// Units: degrees
    target_deg: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for ArmTuning {
    fn default() -> Self {
        Self {
            enabled: false,
            setpoint_deg: DEFAULT_TUNING_SETPOINT_DEG,
            setpoint_velocity_degs: 0.0,
            target_deg: 0.0,
        }
    }
}

impl ArmTuning {
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable tuning.
    ///
    /// Requests outside of teleop, or which don't change the state, are
    /// ignored.
    pub fn set_enabled(&mut self, enabled: bool, robot_mode: RobotMode) {
        if enabled == self.enabled || robot_mode != RobotMode::Teleop {
            return;
        }

        if enabled {
            self.target_deg = self.setpoint_deg;
        }
        self.enabled = enabled;

        debug!("Arm tuning enabled: {}", enabled);
    }

    pub fn setpoint(&self) -> (f64, f64) {
        (self.setpoint_deg, self.setpoint_velocity_degs)
    }

    /// Set the setpoint, which also restarts the target from it.
    pub fn set_setpoint(&mut self, position_deg: f64, velocity_degs: f64) {
        self.setpoint_deg = position_deg;
        self.target_deg = position_deg;
        self.setpoint_velocity_degs = velocity_degs;
    }

    pub fn target_deg(&self) -> f64 {
        self.target_deg
    }
}

impl Command for ArmTuning {
    type Subsystem = ArmCtrl;

    fn execute(&mut self, arm: &mut ArmCtrl) {
        if self.enabled {
            arm.set_target_position_and_velocity(self.target_deg, self.setpoint_velocity_degs);
            self.target_deg += self.setpoint_velocity_degs * CYCLE_PERIOD_S;
        }
        else {
            arm.set_target_output(0.0);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::arm_ctrl::test::homed_arm;
    use crate::setpoint::SetpointMode;

    #[test]
    fn test_enable_gating() {
        let mut cmd = ArmTuning::default();

        cmd.set_enabled(true, RobotMode::Disabled);
        assert!(!cmd.enabled());
        cmd.set_enabled(true, RobotMode::Autonomous);
        assert!(!cmd.enabled());

        cmd.set_enabled(true, RobotMode::Teleop);
        assert!(cmd.enabled());
        assert_eq!(cmd.target_deg(), DEFAULT_TUNING_SETPOINT_DEG);

        // Can't disable outside of teleop either
        cmd.set_enabled(false, RobotMode::Disabled);
        assert!(cmd.enabled());
    }

    #[test]
    fn test_moving_target() {
        let mut arm = homed_arm();
        let mut cmd = ArmTuning::default();

        cmd.execute(&mut arm);
        assert_eq!(arm.mode(), SetpointMode::RawOutput(0.0));

        cmd.set_setpoint(20.0, 10.0);
        cmd.set_enabled(true, RobotMode::Teleop);

        cmd.execute(&mut arm);
        assert_eq!(
            arm.mode(),
            SetpointMode::ClosedLoop { position: Some(20.0), velocity: 10.0 }
        );

        cmd.execute(&mut arm);
        let pos = arm.mode().target_position().unwrap();
        assert!((pos - 20.2).abs() < 1e-9);
    }
}
