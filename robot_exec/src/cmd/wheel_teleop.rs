//! Simple wheel commands: operator control, stop and fixed speed.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::Command;
use crate::wheel_ctrl::WheelCtrl;
use util::maths::{apply_deadband, clamp_norm};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Wheel teleop inputs with a magnitude up to this are treated as zero.
pub const WHEEL_TELEOP_DEADBAND: f64 = 0.1;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Operator control of a wheel's output.
#[derive(Debug, Default)]
pub struct WheelTeleop {
    input: f64,
    last_output: f64,
}

/// Holds the wheel at zero output, the default wheel command.
#[derive(Debug, Default)]
pub struct WheelStop;

/// Spins the wheel at a fixed speed.
#[derive(Debug, Default)]
pub struct WheelRpm {
    /// Units: rotations/minute
    pub rpm: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl WheelTeleop {
    pub fn set_input(&mut self, input: f64) {
        self.input = input;
    }

    pub fn last_output(&self) -> f64 {
        self.last_output
    }
}

impl Command for WheelTeleop {
    type Subsystem = WheelCtrl;

    fn execute(&mut self, wheel: &mut WheelCtrl) {
        self.last_output = clamp_norm(apply_deadband(self.input, WHEEL_TELEOP_DEADBAND));
        wheel.set_target_output(self.last_output);
    }

    fn end(&mut self, wheel: &mut WheelCtrl) {
        self.last_output = 0.0;
        wheel.set_target_output(0.0);
    }
}

impl Command for WheelStop {
    type Subsystem = WheelCtrl;

    fn execute(&mut self, wheel: &mut WheelCtrl) {
        wheel.set_target_output(0.0);
    }
}

impl Command for WheelRpm {
    type Subsystem = WheelCtrl;

    fn execute(&mut self, wheel: &mut WheelCtrl) {
        wheel.set_target_velocity(self.rpm);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::setpoint::SetpointMode;
    use crate::wheel_ctrl::test::shooter;

    #[test]
    fn test_teleop() {
        let mut wheel = shooter();
        let mut cmd = WheelTeleop::default();

        cmd.set_input(0.08);
        cmd.execute(&mut wheel);
        assert_eq!(wheel.mode(), SetpointMode::RawOutput(0.0));

        cmd.set_input(-3.0);
        cmd.execute(&mut wheel);
        assert_eq!(cmd.last_output(), -1.0);

        cmd.end(&mut wheel);
        assert_eq!(wheel.mode(), SetpointMode::RawOutput(0.0));
    }

    #[test]
    fn test_rpm_and_stop() {
        let mut wheel = shooter();

        WheelRpm { rpm: 3000.0 }.execute(&mut wheel);
        assert_eq!(wheel.mode().target_velocity(), Some(3000.0));

        WheelStop.execute(&mut wheel);
        assert_eq!(wheel.mode(), SetpointMode::RawOutput(0.0));
    }
}
