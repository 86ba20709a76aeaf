//! # Arm control module
//!
//! Arm control drives the single rotating arm joint. It owns the arm's
//! [`SetpointMode`](crate::setpoint::SetpointMode), performs the one-shot
//! homing of the relative encoder against the absolute encoder, limits open
//! loop output to the arm's safety bounds and computes the gravity
//! feedforward for closed loop control.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod hold;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use hold::*;
pub use params::*;
pub use state::*;

#[cfg(test)]
pub(crate) use state::test;

use crate::setpoint::BoundsError;
use util::params::LoadError;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during ArmCtrl initialisation.
#[derive(Debug, thiserror::Error)]
pub enum ArmCtrlError {
    #[error("Could not load the arm parameters: {0}")]
    ParamLoadError(LoadError),

    #[error("Invalid arm safety bounds: {0}")]
    InvalidBounds(BoundsError),

    #[error("Invalid arm parameter: {0}")]
    InvalidParam(String),

    #[error("Could not create the arm archives: {0}")]
    ArchiveError(util::archive::ArchiveError),
}
