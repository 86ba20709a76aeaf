//! # Vision Equipment Telemetry
//!
//! Raw data published by the vision camera. The camera publishes flat arrays
//! of numbers, interpreting them is the job of the control executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A flat numeric array and the time it arrived at the robot.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TimestampedArray {
    /// The raw values, in the order the camera publishes them.
    pub value: Vec<f64>,

    /// Arrival time of the array.
    ///
    /// Units: microseconds
    pub timestamp_us: i64,
}

/// Raw target readings of the camera's active pipeline.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct TargetReadings {
    /// Number of valid targets, greater than zero if one is seen.
    pub tv: f64,

    /// Horizontal offset from the crosshair to the target.
    ///
    /// Units: degrees
    pub tx: f64,

    /// Vertical offset from the crosshair to the target.
    ///
    /// Units: degrees
    pub ty: f64,

    /// Target area.
    ///
    /// Units: percent of the image
    pub ta: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Processing pipelines available on the camera.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Copy, Clone)]
pub enum Pipeline {
    Unknown,
    DefaultAprilTag,
    Gamepiece,
}

// -----------------------------------------------------------------------------------------------
// IMPLS
// -----------------------------------------------------------------------------------------------

impl Pipeline {
    /// All selectable pipelines.
    pub const ALL: [Pipeline; 3] = [
        Pipeline::Unknown,
        Pipeline::DefaultAprilTag,
        Pipeline::Gamepiece,
    ];

    /// The pipeline index used by the camera.
    pub fn id(&self) -> i32 {
        match self {
            Pipeline::Unknown => -1,
            Pipeline::DefaultAprilTag => 0,
            Pipeline::Gamepiece => 1,
        }
    }

    /// Look up a pipeline by its camera index, unknown indices give
    /// `Pipeline::Unknown`.
    pub fn for_id(id: i32) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.id() == id)
            .unwrap_or(Pipeline::Unknown)
    }
}
