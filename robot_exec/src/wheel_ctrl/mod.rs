//! # Wheel control module
//!
//! Wheel control drives a spinning wheel (the shooter or intake) either at an
//! open loop output or at a closed loop velocity.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use params::*;
pub use state::*;

#[cfg(test)]
pub(crate) use state::test;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during WheelCtrl initialisation.
#[derive(Debug, thiserror::Error)]
pub enum WheelCtrlError {
    #[error("Could not load the wheel parameters: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("Invalid wheel parameter: {0}")]
    InvalidParam(String),

    #[error("Could not create the wheel archives: {0}")]
    ArchiveError(util::archive::ArchiveError),
}
