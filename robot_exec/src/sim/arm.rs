//! Simulated arm

use super::{controller_output, lag, FREE_SPEED_RPM, FULL_OUTPUT_CURRENT_A, NOMINAL_VOLTAGE};
use crate::arm_ctrl;
use comms_if::eqpt::mech::{ActuatorSens, MotorDems};
use util::maths::{clamp, rem_euclid};

/// Parameters of the simulated arm.
#[derive(Debug, Clone, Copy)]
pub struct SimArmParams {
    /// Units: degrees/motor rotation
    pub degrees_per_rotation: f64,

    /// Reading of the absolute encoder at zero degrees.
    ///
    /// Units: rotations
    pub encoder_offset_rot: f64,

    /// Output needed to hold the arm horizontal.
    pub gravity_output: f64,

    pub time_constant_s: f64,

    /// Hard stops of the arm.
    ///
    /// Units: degrees
    pub hard_stops_deg: (f64, f64),

    /// Units: degrees
    pub start_deg: f64,
}

/// A simulated arm.
///
/// The relative encoder powers up reading zero wherever the arm is, only the
/// absolute encoder knows the true position.
#[derive(Debug, Clone)]
pub struct SimArm {
    params: SimArmParams,

    /// True arm position.
    ///
    /// Units: degrees
    pos_deg: f64,

    /// Units: rotations/minute (motor)
    vel_rpm: f64,

    /// Relative encoder reading minus the true motor position.
    encoder_offset_rot: f64,

    current_a: f64,
}

impl SimArmParams {
    /// A simulated arm matching the controller's parameters, whose gravity
    /// load is exactly cancelled by the configured gravity gain.
    pub fn from_arm_params(params: &arm_ctrl::Params) -> Self {
        Self {
            degrees_per_rotation: params.degrees_per_rotation,
            encoder_offset_rot: params.encoder_offset_rot,
            gravity_output: params.gains.k_g / NOMINAL_VOLTAGE,
            time_constant_s: 0.1,
            hard_stops_deg: (params.min_pos_deg - 5.0, params.max_pos_deg + 5.0),
            start_deg: params.min_pos_deg,
        }
    }
}

impl SimArm {
    pub fn new(params: SimArmParams) -> Self {
        let motor_rot = params.start_deg / params.degrees_per_rotation;

        Self {
            params,
            pos_deg: params.start_deg,
            vel_rpm: 0.0,
            encoder_offset_rot: -motor_rot,
            current_a: 0.0,
        }
    }

    /// True arm position.
    ///
    /// Units: degrees
    pub fn true_position_deg(&self) -> f64 {
        self.pos_deg
    }

    /// Read the arm's sensors.
    pub fn sense(&self) -> ActuatorSens {
        let motor_rot = self.pos_deg / self.params.degrees_per_rotation;

        ActuatorSens {
            pos_rot: motor_rot + self.encoder_offset_rot,
            vel_rpm: self.vel_rpm,
            current_a: self.current_a,
            abs_pos_rot: Some(rem_euclid(
                self.pos_deg / 360.0 + self.params.encoder_offset_rot,
                1.0,
            )),
        }
    }

    /// Apply the demands for one step of `dt_s` seconds.
    pub fn step(&mut self, dems: &MotorDems, dt_s: f64) {
        let sens = self.sense();

        if let Some(reset) = dems.encoder_reset_rot {
            self.encoder_offset_rot = reset - self.pos_deg / self.params.degrees_per_rotation;
        }

        let pos_rot = match dems.encoder_reset_rot {
            Some(r) => r,
            None => sens.pos_rot,
        };

        let output = controller_output(&dems.dem, pos_rot, self.vel_rpm);
        self.current_a = output.abs() * FULL_OUTPUT_CURRENT_A;

        // Gravity pulls the arm down hardest when horizontal
        let net_output =
            output - self.params.gravity_output * self.pos_deg.to_radians().cos();

        self.vel_rpm = lag(
            self.vel_rpm,
            net_output * FREE_SPEED_RPM,
            self.params.time_constant_s,
            dt_s,
        );

        let (low, high) = self.params.hard_stops_deg;
        let next_deg =
            self.pos_deg + self.vel_rpm / 60.0 * self.params.degrees_per_rotation * dt_s;
        self.pos_deg = clamp(&next_deg, &low, &high);

        if self.pos_deg == low || self.pos_deg == high {
            self.vel_rpm = 0.0;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::eqpt::mech::MotorDem;

    fn params() -> SimArmParams {
        SimArmParams {
            degrees_per_rotation: 2.0,
            encoder_offset_rot: 0.0,
            gravity_output: 0.035,
            time_constant_s: 0.1,
            hard_stops_deg: (-5.0, 110.0),
            start_deg: 30.0,
        }
    }

    #[test]
    fn test_encoders() {
        let arm = SimArm::new(params());
        let sens = arm.sense();

        assert!(sens.pos_rot.abs() < 1e-12);
        assert!((sens.abs_pos_rot.unwrap() - 30.0 / 360.0).abs() < 1e-12);
    }

    #[test]
    fn test_encoder_reset() {
        let mut arm = SimArm::new(params());

        let dems = MotorDems {
            encoder_reset_rot: Some(15.0),
            ..Default::default()
        };
        arm.step(&dems, 0.02);
        assert!((arm.sense().pos_rot - arm.true_position_deg() / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_arm_falls_without_output() {
        let mut arm = SimArm::new(params());

        for _ in 0..500 {
            arm.step(&MotorDems::default(), 0.02);
        }
        assert_eq!(arm.true_position_deg(), -5.0);

        // And rises with full output
        let up = MotorDems {
            dem: MotorDem::Output(1.0),
            ..Default::default()
        };
        for _ in 0..500 {
            arm.step(&up, 0.02);
        }
        assert_eq!(arm.true_position_deg(), 110.0);
    }
}
