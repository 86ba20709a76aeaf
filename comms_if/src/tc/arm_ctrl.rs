//! # Arm control telecommands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Commands accepted by arm control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ArmCmd {
    /// Run the operator teleop command on the arm (the default).
    Teleop,

    /// Run the closed loop tuning command on the arm.
    Tuning,

    /// Run the motion profile tuning command on the arm.
    ProfileTuning,

    /// Enable or disable the active tuning command. Ignored outside of
    /// teleop.
    TuningEnable(bool),

    /// Set the setpoint used by the tuning commands.
    TuningSetpoint {
        /// Units: degrees
        position_deg: f64,

        /// Only used by the closed loop tuning command.
        ///
        /// Units: degrees/second
        velocity_degs: f64,
    },

    /// Set the constraints used by the motion profile tuning command.
    ProfileConstraints {
        /// Units: degrees/second
        max_velocity_degs: f64,

        /// Units: degrees/second^2
        max_acceleration_degss: f64,
    },

    /// Set any of the arm's controller gains. `None` leaves a gain unchanged.
    Gains {
        k_p: Option<f64>,
        k_g: Option<f64>,
        k_v: Option<f64>,
    },

    /// Enable or disable the motor brake.
    Brake(bool),
}
