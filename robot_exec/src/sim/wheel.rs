//! Simulated wheel

use super::{controller_output, lag, FREE_SPEED_RPM, FULL_OUTPUT_CURRENT_A};
use comms_if::eqpt::mech::{ActuatorSens, MotorDems};

/// A simulated spinning wheel.
#[derive(Debug, Clone)]
pub struct SimWheel {
    time_constant_s: f64,

    pos_rot: f64,

    vel_rpm: f64,

    current_a: f64,
}

impl SimWheel {
    pub fn new(time_constant_s: f64) -> Self {
        Self {
            time_constant_s,
            pos_rot: 0.0,
            vel_rpm: 0.0,
            current_a: 0.0,
        }
    }

    pub fn sense(&self) -> ActuatorSens {
        ActuatorSens {
            pos_rot: self.pos_rot,
            vel_rpm: self.vel_rpm,
            current_a: self.current_a,
            abs_pos_rot: None,
        }
    }

    /// Apply the demands for one step of `dt_s` seconds.
    pub fn step(&mut self, dems: &MotorDems, dt_s: f64) {
        if let Some(r) = dems.encoder_reset_rot {
            self.pos_rot = r;
        }

        let output = controller_output(&dems.dem, self.pos_rot, self.vel_rpm);
        self.current_a = output.abs() * FULL_OUTPUT_CURRENT_A;

        self.vel_rpm = lag(self.vel_rpm, output * FREE_SPEED_RPM, self.time_constant_s, dt_s);
        self.pos_rot += self.vel_rpm / 60.0 * dt_s;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::eqpt::mech::MotorDem;

    #[test]
    fn test_spin_up() {
        let mut wheel = SimWheel::new(0.1);

        let dems = MotorDems {
            dem: MotorDem::Output(0.5),
            ..Default::default()
        };
        for _ in 0..200 {
            wheel.step(&dems, 0.02);
        }

        assert!((wheel.sense().vel_rpm - 0.5 * FREE_SPEED_RPM).abs() < 1.0);
        assert_eq!(wheel.sense().current_a, 20.0);
    }
}
