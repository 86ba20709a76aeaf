//! # Wheel control telecommands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The spinning wheels on the robot.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum WheelId {
    Shooter,
    Intake,
}

/// Commands accepted by wheel control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WheelCmd {
    /// Stop the wheel (the default).
    Stop,

    /// Run the operator teleop command on the wheel.
    Teleop,

    /// Spin the wheel at a fixed speed.
    ///
    /// Units: rotations/minute
    Rpm(f64),

    /// Run the tuning command on the wheel.
    Tuning,

    /// Enable or disable the tuning command. Ignored outside of teleop.
    TuningEnable(bool),

    /// Set the tuning command's setpoint.
    ///
    /// Units: rotations/minute
    TuningSetpoint(f64),

    /// Set any of the wheel's controller gains. `None` leaves a gain
    /// unchanged.
    Gains {
        k_p: Option<f64>,
        k_v: Option<f64>,
    },

    /// Enable or disable the motor brake.
    Brake(bool),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl WheelId {
    /// All wheels on the robot.
    pub const ALL: [WheelId; 2] = [WheelId::Shooter, WheelId::Intake];

    /// Lowercase name of the wheel, used for archive and parameter paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            WheelId::Shooter => "shooter",
            WheelId::Intake => "intake",
        }
    }
}
