//! # Vision module
//!
//! Decodes the pose estimates published by the vision camera and forwards
//! those which are valid to a [`PoseSink`].
//!
//! The camera publishes each estimate as a flat array:
//!
//! | Index | Value                          |
//! |-------|--------------------------------|
//! | 0, 1  | Field position (meters)        |
//! | 5     | Heading (degrees)              |
//! | 6     | Pipeline latency (ms)          |
//! | 7     | Number of tags seen            |
//! | 8     | Span of the tags (meters)      |
//! | 9     | Average tag distance (meters)  |
//! | 10    | Average tag area (% of image)  |
//!
//! Only the first six values are required, missing diagnostics read as zero.
//!
//! The camera also reports the target seen by its active pipeline, decoded
//! into a [`TargetInfo`].

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod pose_estimate_cmd;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Point2;
use serde::Serialize;

pub use pose_estimate_cmd::PoseEstimateCmd;

use comms_if::eqpt::vision::{Pipeline, TargetReadings, TimestampedArray};
use util::time::{micros_to_seconds, millis_to_seconds};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Shortest array which holds a complete pose.
pub const MIN_POSE_ARRAY_LEN: usize = 6;

const IDX_X: usize = 0;
const IDX_Y: usize = 1;
const IDX_HEADING: usize = 5;
const IDX_LATENCY: usize = 6;
const IDX_TAG_COUNT: usize = 7;
const IDX_TAG_SPAN: usize = 8;
const IDX_AVG_TAG_DIST: usize = 9;
const IDX_AVG_TAG_AREA: usize = 10;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Something which folds pose estimates into the robot's position estimate.
pub trait PoseSink {
    fn accept_pose_estimate(&mut self, estimate: &PoseEstimate);
}

/// The vision camera.
pub trait VisionSource {
    /// The latest pose array, or `None` if the camera hasn't published one.
    fn pose_array(&mut self) -> Option<TimestampedArray>;

    fn set_pipeline(&mut self, pipeline: Pipeline);

    fn current_pipeline(&self) -> Pipeline;

    /// The latest target readings of the active pipeline.
    fn target_readings(&mut self) -> TargetReadings;

    /// Publish the robot's orientation, used by the camera to disambiguate
    /// tag poses.
    fn set_robot_orientation(&mut self, orientation: [f64; 6]);
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A pose estimate from the vision camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PoseEstimate {
    /// Units: meters
    pub position_m: Point2<f64>,

    /// Units: degrees
    pub heading_deg: f64,

    /// Time at which the camera made the observation, i.e. the arrival time
    /// less the pipeline latency.
    ///
    /// Units: seconds
    pub timestamp_s: f64,

    /// Units: milliseconds
    pub latency_ms: f64,

    pub tag_count: u32,

    /// Units: meters
    pub tag_span_m: f64,

    /// Units: meters
    pub avg_tag_distance_m: f64,

    /// Units: percent of the image
    pub avg_tag_area_pct: f64,
}

/// The target seen by the camera's active pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TargetInfo {
    pub has_target: bool,

    /// Units: degrees
    pub horizontal_offset_deg: f64,

    /// Units: degrees
    pub vertical_offset_deg: f64,

    /// Units: percent of the image
    pub area_pct: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TargetInfo {
    /// No target, all offsets zero.
    pub fn no_target() -> Self {
        Self::default()
    }

    /// Decode the camera's target readings. Offsets are only kept when the
    /// camera reports a valid target.
    pub fn from_readings(readings: &TargetReadings) -> Self {
        if readings.tv > 0.0 {
            Self {
                has_target: true,
                horizontal_offset_deg: readings.tx,
                vertical_offset_deg: readings.ty,
                area_pct: readings.ta,
            }
        }
        else {
            Self::no_target()
        }
    }
}

impl PoseEstimate {
    /// Decode a pose estimate from the raw camera array and its arrival time.
    ///
    /// Returns `None` if the array is too short to hold a pose.
    pub fn decode(raw: &[f64], timestamp_us: i64) -> Option<Self> {
        if raw.len() < MIN_POSE_ARRAY_LEN {
            return None;
        }

        let get = |idx: usize| raw.get(idx).copied().unwrap_or(0.0);

        let latency_ms = get(IDX_LATENCY);

        Some(Self {
            position_m: Point2::new(get(IDX_X), get(IDX_Y)),
            heading_deg: get(IDX_HEADING),
            timestamp_s: micros_to_seconds(timestamp_us) - millis_to_seconds(latency_ms),
            latency_ms,
            // Saturating cast, NaN reads as no tags
            tag_count: get(IDX_TAG_COUNT) as u32,
            tag_span_m: get(IDX_TAG_SPAN),
            avg_tag_distance_m: get(IDX_AVG_TAG_DIST),
            avg_tag_area_pct: get(IDX_AVG_TAG_AREA),
        })
    }

    /// Decode a pose estimate from a timestamped camera array.
    pub fn from_array(array: &TimestampedArray) -> Option<Self> {
        Self::decode(&array.value, array.timestamp_us)
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// The orientation array published to the camera for a robot heading.
pub fn orientation_array(heading_deg: f64) -> [f64; 6] {
    [heading_deg, 0.0, 0.0, 0.0, 0.0, 0.0]
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_short_array() {
        assert_eq!(PoseEstimate::decode(&[1.0, 2.0, 0.0, 0.0, 0.0], 5_000_000), None);
        assert_eq!(PoseEstimate::decode(&[], 0), None);
    }

    #[test]
    fn test_full_array() {
        let raw = [1.0, 2.0, 0.0, 0.0, 0.0, 30.0, 20.0, 4.0, 1.5, 2.0, 10.0];
        let est = PoseEstimate::decode(&raw, 5_000_000).unwrap();

        assert_eq!(est.position_m, Point2::new(1.0, 2.0));
        assert_eq!(est.heading_deg, 30.0);
        assert_eq!(est.latency_ms, 20.0);
        assert_eq!(est.timestamp_s, 5.0 - 0.02);
        assert_eq!(est.tag_count, 4);
        assert_eq!(est.tag_span_m, 1.5);
        assert_eq!(est.avg_tag_distance_m, 2.0);
        assert_eq!(est.avg_tag_area_pct, 10.0);
    }

    #[test]
    fn test_minimal_array() {
        let raw = [3.0, -1.0, 0.0, 0.0, 0.0, 90.0];
        let est = PoseEstimate::decode(&raw, 1_500_000).unwrap();

        assert_eq!(est.heading_deg, 90.0);
        assert_eq!(est.latency_ms, 0.0);
        assert_eq!(est.timestamp_s, 1.5);
        assert_eq!(est.tag_count, 0);
        assert_eq!(est.avg_tag_area_pct, 0.0);
    }

    #[test]
    fn test_tag_count_cast() {
        let mut raw = [0.0; 8];
        raw[IDX_TAG_COUNT] = f64::NAN;
        assert_eq!(PoseEstimate::decode(&raw, 0).unwrap().tag_count, 0);

        raw[IDX_TAG_COUNT] = -3.0;
        assert_eq!(PoseEstimate::decode(&raw, 0).unwrap().tag_count, 0);

        raw[IDX_TAG_COUNT] = 2.9;
        assert_eq!(PoseEstimate::decode(&raw, 0).unwrap().tag_count, 2);
    }

    #[test]
    fn test_target_info() {
        let readings = TargetReadings {
            tv: 1.0,
            tx: -4.5,
            ty: 2.0,
            ta: 0.8,
        };
        assert_eq!(
            TargetInfo::from_readings(&readings),
            TargetInfo {
                has_target: true,
                horizontal_offset_deg: -4.5,
                vertical_offset_deg: 2.0,
                area_pct: 0.8,
            }
        );

        // Stale offsets are cleared when the target is lost
        let lost = TargetReadings { tv: 0.0, ..readings };
        assert_eq!(TargetInfo::from_readings(&lost), TargetInfo::no_target());
        assert!(!TargetInfo::from_readings(&lost).has_target);

        let nan = TargetReadings { tv: f64::NAN, ..readings };
        assert_eq!(TargetInfo::from_readings(&nan), TargetInfo::no_target());
    }

    #[test]
    fn test_orientation_array() {
        assert_eq!(orientation_array(45.0), [45.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    }
}
