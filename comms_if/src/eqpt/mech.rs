//! # Mechanisms Equipment Commands
//!
//! Demands sent to, and readings received from, the smart motor controllers
//! driving the robot's actuators.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Demands that are sent to a single motor controller each cycle.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct MotorDems {
    /// The control demand to execute this cycle.
    pub dem: MotorDem,

    /// Behaviour of the motor when no output is applied.
    pub idle_mode: IdleMode,

    /// If set the controller's relative encoder shall be reset to this
    /// position before the demand is applied.
    ///
    /// Units: motor rotations
    pub encoder_reset_rot: Option<f64>,
}

/// Sensor data read back from a motor controller at the start of each cycle.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct ActuatorSens {
    /// Relative (integrated) encoder position.
    ///
    /// Units: motor rotations
    pub pos_rot: f64,

    /// Relative encoder velocity.
    ///
    /// Units: rotations/minute
    pub vel_rpm: f64,

    /// Current drawn by the motor.
    ///
    /// Units: amps
    pub current_a: f64,

    /// Absolute (duty cycle) encoder reading, if the actuator has one.
    ///
    /// Units: output shaft rotations, in `[0, 1)`
    pub abs_pos_rot: Option<f64>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The control demand for a motor controller.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum MotorDem {
    /// Open loop normalised output in `[-1, 1]`.
    Output(f64),

    /// Closed loop position tracking on the controller.
    Position {
        /// Units: motor rotations
        pos_rot: f64,

        /// Proportional gain the controller shall use.
        k_p: f64,

        /// Arbitrary feedforward added to the controller output.
        ///
        /// Units: volts
        arb_ff_v: f64,
    },

    /// Closed loop velocity tracking on the controller.
    Velocity {
        /// Units: rotations/minute
        vel_rpm: f64,

        /// Proportional gain the controller shall use.
        k_p: f64,

        /// Arbitrary feedforward added to the controller output.
        ///
        /// Units: volts
        arb_ff_v: f64,
    },
}

/// Motor idle behaviour.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Copy, Clone)]
pub enum IdleMode {
    Brake,
    Coast,
}

// -----------------------------------------------------------------------------------------------
// IMPLS
// -----------------------------------------------------------------------------------------------

impl Default for MotorDems {
    fn default() -> Self {
        Self {
            dem: MotorDem::Output(0.0),
            idle_mode: IdleMode::Brake,
            encoder_reset_rot: None,
        }
    }
}

impl MotorDems {
    /// A zero output demand with the given idle mode.
    pub fn stop(idle_mode: IdleMode) -> Self {
        Self {
            idle_mode,
            ..Default::default()
        }
    }
}

impl IdleMode {
    /// Build the idle mode from a "brake enabled" flag.
    pub fn from_brake(brake_enabled: bool) -> Self {
        if brake_enabled {
            IdleMode::Brake
        }
        else {
            IdleMode::Coast
        }
    }
}
