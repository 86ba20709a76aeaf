//! Feedforward models used by the closed loop controllers.

use serde::Serialize;

/// Feedforward for a rotating arm acting against gravity.
///
/// `ff = k_s * sign(v) + k_g * cos(pos) + k_v * v`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ArmFeedforward {
    pub k_s: f64,
    pub k_g: f64,
    pub k_v: f64,
}

/// Feedforward for a simple motor with no gravity load.
///
/// `ff = k_s * sign(v) + k_v * v`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SimpleMotorFeedforward {
    pub k_s: f64,
    pub k_v: f64,
}

impl ArmFeedforward {
    pub fn new(k_s: f64, k_g: f64, k_v: f64) -> Self {
        Self { k_s, k_g, k_v }
    }

    /// Calculate the feedforward for an arm at `position_rad` moving at
    /// `velocity`.
    pub fn calculate(&self, position_rad: f64, velocity: f64) -> f64 {
        self.k_s * signum(velocity) + self.k_g * position_rad.cos() + self.k_v * velocity
    }
}

impl SimpleMotorFeedforward {
    pub fn new(k_s: f64, k_v: f64) -> Self {
        Self { k_s, k_v }
    }

    /// Calculate the feedforward for a motor spinning at `velocity`.
    pub fn calculate(&self, velocity: f64) -> f64 {
        self.k_s * signum(velocity) + self.k_v * velocity
    }
}

/// Sign of a value, with zero mapping to zero (`f64::signum` gives 1 for 0).
fn signum(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    }
    else if v < 0.0 {
        -1.0
    }
    else {
        0.0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_arm_feedforward() {
        let ff = ArmFeedforward::new(0.0, 0.42, 0.0);

        // Horizontal arm needs the full gravity term, vertical arm none
        assert!((ff.calculate(0.0, 0.0) - 0.42).abs() < 1e-12);
        assert!(ff.calculate(std::f64::consts::FRAC_PI_2, 0.0).abs() < 1e-12);

        let ff = ArmFeedforward::new(0.1, 0.0, 0.5);
        assert!((ff.calculate(0.0, 2.0) - 1.1).abs() < 1e-12);
        assert!((ff.calculate(0.0, -2.0) + 1.1).abs() < 1e-12);
        assert_eq!(ff.calculate(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_simple_feedforward() {
        let ff = SimpleMotorFeedforward::new(0.0, 0.002);
        assert!((ff.calculate(2500.0) - 5.0).abs() < 1e-12);
    }
}
