//! Closed loop tuning of a wheel.

use log::debug;

use super::Command;
use crate::wheel_ctrl::WheelCtrl;
use comms_if::tc::RobotMode;

/// Units: rotations/minute
pub const DEFAULT_TUNING_RPM: f64 = 250.0;

#[derive(Debug)]
pub struct WheelTuning {
    enabled: bool,

    /// Units: rotations/minute
    setpoint_rpm: f64,
}

impl Default for WheelTuning {
    fn default() -> Self {
        Self {
            enabled: false,
            setpoint_rpm: DEFAULT_TUNING_RPM,
        }
    }
}

impl WheelTuning {
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
        self.enabled = enabled;

        debug!("Wheel tuning enabled: {}", enabled);
    }

    pub fn setpoint_rpm(&self) -> f64 {
        self.setpoint_rpm
    }

    pub fn set_setpoint_rpm(&mut self, rpm: f64) {
        self.setpoint_rpm = rpm;
    }
}

impl Command for WheelTuning {
    type Subsystem = WheelCtrl;

    fn execute(&mut self, wheel: &mut WheelCtrl) {
        if self.enabled {
            wheel.set_target_velocity(self.setpoint_rpm);
        }
        else {
            wheel.set_target_output(0.0);
        }
    }

    fn end(&mut self, wheel: &mut WheelCtrl) {
        wheel.set_target_output(0.0);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::setpoint::SetpointMode;
    use crate::wheel_ctrl::test::shooter;

    #[test]
    fn test_wheel_tuning() {
        let mut wheel = shooter();
        let mut cmd = WheelTuning::default();

        cmd.set_enabled(true, RobotMode::Autonomous);
        cmd.execute(&mut wheel);
        assert_eq!(wheel.mode(), SetpointMode::RawOutput(0.0));

        cmd.set_enabled(true, RobotMode::Teleop);
        cmd.execute(&mut wheel);
        assert_eq!(wheel.mode().target_velocity(), Some(DEFAULT_TUNING_RPM));

        cmd.set_setpoint_rpm(1000.0);
        cmd.execute(&mut wheel);
        assert_eq!(wheel.mode().target_velocity(), Some(1000.0));

        cmd.end(&mut wheel);
        assert_eq!(wheel.mode(), SetpointMode::RawOutput(0.0));
    }
}
