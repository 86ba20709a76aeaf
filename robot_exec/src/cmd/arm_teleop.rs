//! Operator control of the arm.
//!
//! Moves the arm at a fraction of full output from the operator's input, and
//! holds the arm still at its last position when the input is neutral.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::Command;
use crate::arm_ctrl::{ArmCtrl, HoldAction, HoldPolicy, HoldState};
use util::maths::{apply_deadband, clamp_norm};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of the arm teleop command.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ArmTeleopParams {
    /// Inputs with a magnitude up to this are treated as neutral.
    pub deadband: f64,

    /// The arm is only held above this position.
    ///
    /// Units: degrees
    pub min_pos_for_hold_deg: f64,
}

pub struct ArmTeleop {
    params: ArmTeleopParams,
    hold: HoldPolicy,
    input: f64,
    last_output: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for ArmTeleopParams {
    fn default() -> Self {
        Self {
            deadband: 0.1,
            min_pos_for_hold_deg: 1.0,
        }
    }
}

impl ArmTeleop {
    pub fn new(params: ArmTeleopParams) -> Self {
        Self {
            params,
            hold: HoldPolicy::new(params.min_pos_for_hold_deg),
            input: 0.0,
            last_output: 0.0,
        }
    }

    /// Set the operator's input, sampled on every following execution.
    pub fn set_input(&mut self, input: f64) {
        self.input = input;
    }

    /// The output after deadbanding and clamping on the last execution.
    pub fn last_output(&self) -> f64 {
        self.last_output
    }

    pub fn hold_state(&self) -> HoldState {
        self.hold.state()
    }

    fn apply(action: HoldAction, arm: &mut ArmCtrl) {
        match action {
            HoldAction::Hold(pos_deg) => arm.set_target_position(pos_deg),
            HoldAction::Output(output) => arm.set_target_output(output),
        }
    }
}

impl Command for ArmTeleop {
    type Subsystem = ArmCtrl;

    fn initialize(&mut self, _arm: &mut ArmCtrl) {
        self.hold.reset();
    }

    fn execute(&mut self, arm: &mut ArmCtrl) {
        // Deadband before clamping so full scale input is never suppressed
        self.last_output = clamp_norm(apply_deadband(self.input, self.params.deadband));

        let action = self.hold.update(self.last_output, arm.current_position());
        Self::apply(action, arm);
    }

    fn end(&mut self, arm: &mut ArmCtrl) {
        self.last_output = 0.0;

        let action = self.hold.end(arm.current_position());
        Self::apply(action, arm);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::arm_ctrl::test::{homed_arm, sens_at};
    use crate::setpoint::SetpointMode;
    use util::module::State;

    #[test]
    fn test_hold_when_neutral() {
        let mut arm = homed_arm();
        let mut cmd = ArmTeleop::new(ArmTeleopParams::default());
        cmd.initialize(&mut arm);

        arm.proc(&sens_at(10.0)).unwrap();
        cmd.set_input(0.05);
        cmd.execute(&mut arm);
        assert_eq!(cmd.last_output(), 0.0);
        assert_eq!(cmd.hold_state(), HoldState::Holding(10.0));
        assert_eq!(arm.mode().target_position(), Some(10.0));

        // Drifting arm keeps the original latch
        arm.proc(&sens_at(12.0)).unwrap();
        cmd.execute(&mut arm);
        assert_eq!(arm.mode().target_position(), Some(10.0));

        // Operator input releases the hold
        cmd.set_input(-0.6);
        cmd.execute(&mut arm);
        assert_eq!(cmd.hold_state(), HoldState::Released);
        assert_eq!(arm.mode(), SetpointMode::RawOutput(-0.6));
    }

    #[test]
    fn test_full_scale_input() {
        let mut arm = homed_arm();
        let mut cmd = ArmTeleop::new(ArmTeleopParams::default());
        cmd.initialize(&mut arm);

        cmd.set_input(1.5);
        cmd.execute(&mut arm);
        assert_eq!(cmd.last_output(), 1.0);
        assert_eq!(arm.mode(), SetpointMode::RawOutput(1.0));
    }

    #[test]
    fn test_lowered_arm_not_held() {
        let mut arm = homed_arm();
        let mut cmd = ArmTeleop::new(ArmTeleopParams::default());
        cmd.initialize(&mut arm);

        arm.proc(&sens_at(0.5)).unwrap();
        cmd.execute(&mut arm);
        assert_eq!(cmd.hold_state(), HoldState::Released);
        assert_eq!(arm.mode(), SetpointMode::RawOutput(0.0));
    }

    #[test]
    fn test_end_holds_raised_arm() {
        let mut arm = homed_arm();
        let mut cmd = ArmTeleop::new(ArmTeleopParams::default());
        cmd.initialize(&mut arm);

        arm.proc(&sens_at(40.0)).unwrap();
        cmd.set_input(0.5);
        cmd.execute(&mut arm);

        cmd.end(&mut arm);
        assert_eq!(arm.mode().target_position(), Some(40.0));

        // Restarting clears the latch
        cmd.initialize(&mut arm);
        assert_eq!(cmd.hold_state(), HoldState::Released);

        arm.proc(&sens_at(0.0)).unwrap();
        cmd.end(&mut arm);
        assert_eq!(arm.mode(), SetpointMode::RawOutput(0.0));
    }
}
