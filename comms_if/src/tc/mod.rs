//! # Telecommand module
//!
//! Telecommands are the instructions given to the robot from outside the
//! control loop: the operator's inputs, command selection, and the values a
//! tuning dashboard writes.
//!
//! Telecommands are JSON objects of the form
//! `{"type": "<TYPE>", "payload": <payload>}`.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod arm_ctrl;
pub mod wheel_ctrl;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use serde::{Serialize, Deserialize};
use thiserror::Error;

// Internal
use crate::eqpt::vision::Pipeline;
use arm_ctrl::ArmCmd;
use wheel_ctrl::{WheelCmd, WheelId};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A telecommand, i.e. an instruction sent to the robot from outside the
/// control loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tc {
    /// Change the robot's operating mode.
    SetMode(RobotMode),

    /// Operator arm input, normalised to `[-1, 1]` before deadbanding.
    ArmInput(f64),

    /// Operator input for one of the wheels.
    WheelInput {
        wheel: WheelId,
        value: f64,
    },

    /// Arm control command.
    Arm(ArmCmd),

    /// Wheel control command.
    Wheel {
        wheel: WheelId,
        cmd: WheelCmd,
    },

    /// Vision command.
    Vision(VisionCmd),
}

/// Operating modes of the robot.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum RobotMode {
    /// No actuator may move.
    Disabled,

    /// Operator control.
    Teleop,

    /// Autonomous control.
    Autonomous,
}

/// Commands for the vision pose estimation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum VisionCmd {
    /// Select the camera pipeline used for pose estimation.
    SetPipeline(Pipeline),

    /// Enable or disable logging of every accepted pose estimate.
    Log(bool),
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum TcParseError {
    #[error("TC contains invalid JSON or is not a recognised TC: {0}")]
    InvalidJson(serde_json::Error),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Tc {

    /// Parse a new TC from a JSON packet
    pub fn from_json(json_str: &str) -> Result<Self, TcParseError> {
        let tc = serde_json::from_str(json_str).map_err(TcParseError::InvalidJson)?;

        trace!("Parsed TC: {:?}", tc);

        Ok(tc)
    }

    /// Serialise the TC into a JSON packet
    pub fn to_json(&self) -> Result<String, TcParseError> {
        serde_json::to_string(self).map_err(TcParseError::InvalidJson)
    }
}

impl Default for RobotMode {
    fn default() -> Self {
        RobotMode::Disabled
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_tcs() {
        assert_eq!(
            Tc::from_json(r#"{"type": "SET_MODE", "payload": "Teleop"}"#).unwrap(),
            Tc::SetMode(RobotMode::Teleop)
        );
        assert_eq!(
            Tc::from_json(r#"{"type": "ARM", "payload": {"TuningEnable": true}}"#).unwrap(),
            Tc::Arm(ArmCmd::TuningEnable(true))
        );
        assert_eq!(
            Tc::from_json(
                r#"{"type": "WHEEL", "payload": {"wheel": "Shooter", "cmd": {"Rpm": 2500.0}}}"#
            ).unwrap(),
            Tc::Wheel { wheel: WheelId::Shooter, cmd: WheelCmd::Rpm(2500.0) }
        );
        assert_eq!(
            Tc::from_json(
                r#"{"type": "VISION", "payload": {"SetPipeline": "DefaultAprilTag"}}"#
            ).unwrap(),
            Tc::Vision(VisionCmd::SetPipeline(Pipeline::DefaultAprilTag))
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Tc::from_json("not json").is_err());
        assert!(Tc::from_json(r#"{"type": "SELF_DESTRUCT"}"#).is_err());
        assert!(Tc::from_json(r#"{"type": "ARM_INPUT"}"#).is_err());
    }

    #[test]
    fn test_to_json() {
        let tc = Tc::WheelInput { wheel: WheelId::Intake, value: -0.5 };
        assert_eq!(Tc::from_json(&tc.to_json().unwrap()).unwrap(), tc);
    }
}
