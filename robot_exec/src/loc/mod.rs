//! # Localisation module
//!
//! Keeps the robot's estimate of its pose on the field, fusing in the pose
//! estimates from the vision camera.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{trace, warn};
use nalgebra::{Point2, UnitComplex};
use serde::Serialize;

use crate::vision::{PoseEstimate, PoseSink};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The pose (position and heading in the field frame) of the robot.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Pose {
    /// Units: meters
    pub position_m: Point2<f64>,

    /// Rotation from the field X axis to the robot's forward axis.
    pub attitude: UnitComplex<f64>,
}

/// Provides an interface for the localisation system of the robot.
#[derive(Debug, Clone, Default)]
pub struct LocMgr {
    pose: Option<Pose>,

    /// Observation time of the last accepted estimate.
    ///
    /// Units: seconds
    last_estimate_s: Option<f64>,

    num_accepted: u64,

    num_rejected: u64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose {
    pub fn new(x_m: f64, y_m: f64, heading_deg: f64) -> Self {
        Self {
            position_m: Point2::new(x_m, y_m),
            attitude: UnitComplex::new(heading_deg.to_radians()),
        }
    }

    /// Heading of the robot in degrees, in `(-180, 180]`.
    pub fn get_heading_deg(&self) -> f64 {
        self.attitude.angle().to_degrees()
    }
}

impl LocMgr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the pose, for example at the start of a match.
    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = Some(pose);
    }

    pub fn get_pose(&self) -> Option<Pose> {
        self.pose
    }

    pub fn last_estimate_s(&self) -> Option<f64> {
        self.last_estimate_s
    }

    pub fn num_accepted(&self) -> u64 {
        self.num_accepted
    }

    pub fn num_rejected(&self) -> u64 {
        self.num_rejected
    }
}

impl PoseSink for LocMgr {
    /// Fuse a vision estimate into the pose.
    ///
    /// Estimates observed before the last accepted one, or which are not
    /// finite, are discarded.
    fn accept_pose_estimate(&mut self, estimate: &PoseEstimate) {
        let finite = estimate.position_m.x.is_finite()
            && estimate.position_m.y.is_finite()
            && estimate.heading_deg.is_finite()
            && estimate.timestamp_s.is_finite();

        if !finite {
            warn!("Discarding non-finite pose estimate: {:?}", estimate);
            self.num_rejected += 1;
            return;
        }

        if let Some(last) = self.last_estimate_s {
            if estimate.timestamp_s < last {
                trace!(
                    "Discarding stale pose estimate ({:.3} s, last {:.3} s)",
                    estimate.timestamp_s,
                    last
                );
                self.num_rejected += 1;
                return;
            }
        }

        self.pose = Some(Pose {
            position_m: estimate.position_m,
            attitude: UnitComplex::new(estimate.heading_deg.to_radians()),
        });
        self.last_estimate_s = Some(estimate.timestamp_s);
        self.num_accepted += 1;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn estimate_at(timestamp_us: i64, x: f64, heading_deg: f64) -> PoseEstimate {
        PoseEstimate::decode(&[x, 0.0, 0.0, 0.0, 0.0, heading_deg, 20.0], timestamp_us).unwrap()
    }

    #[test]
    fn test_accept() {
        let mut loc = LocMgr::new();
        assert_eq!(loc.get_pose(), None);

        loc.accept_pose_estimate(&estimate_at(2_000_000, 1.0, 90.0));
        let pose = loc.get_pose().unwrap();
        assert_eq!(pose.position_m, Point2::new(1.0, 0.0));
        assert!((pose.get_heading_deg() - 90.0).abs() < 1e-9);
        assert!((loc.last_estimate_s().unwrap() - 1.98).abs() < 1e-12);
    }

    #[test]
    fn test_stale_estimate_ignored() {
        let mut loc = LocMgr::new();

        loc.accept_pose_estimate(&estimate_at(2_000_000, 1.0, 0.0));
        loc.accept_pose_estimate(&estimate_at(1_000_000, 5.0, 0.0));

        assert_eq!(loc.get_pose().unwrap().position_m.x, 1.0);
        assert_eq!(loc.num_accepted(), 1);
        assert_eq!(loc.num_rejected(), 1);

        loc.accept_pose_estimate(&estimate_at(3_000_000, 5.0, 0.0));
        assert_eq!(loc.get_pose().unwrap().position_m.x, 5.0);
    }

    #[test]
    fn test_non_finite_ignored() {
        let mut loc = LocMgr::new();

        loc.accept_pose_estimate(&estimate_at(1_000_000, f64::NAN, 0.0));
        assert_eq!(loc.get_pose(), None);
        assert_eq!(loc.num_rejected(), 1);
    }
}
