//! Simulated vision camera

use comms_if::eqpt::vision::{Pipeline, TargetReadings, TimestampedArray};
use crate::vision::VisionSource;
use crate::loc::Pose;

/// Latency the simulated camera reports for each estimate.
///
/// Units: milliseconds
pub const SIM_LATENCY_MS: f64 = 20.0;

/// A simulated camera which sees a fixed robot pose.
///
/// Estimates are only published while the AprilTag pipeline is selected, and
/// only every `period_cycles` steps. A gamepiece placed in view is only
/// reported as a target while the gamepiece pipeline is selected.
#[derive(Debug, Clone)]
pub struct SimVision {
    true_pose: Pose,
    pipeline: Pipeline,
    orientation: [f64; 6],
    period_cycles: u64,
    num_steps: u64,
    time_us: i64,
    latest: Option<TimestampedArray>,
    gamepiece: Option<TargetReadings>,
}

impl SimVision {
    pub fn new(true_pose: Pose, period_cycles: u64) -> Self {
        Self {
            true_pose,
            pipeline: Pipeline::Unknown,
            orientation: [0.0; 6],
            period_cycles: period_cycles.max(1),
            num_steps: 0,
            time_us: 0,
            latest: None,
            gamepiece: None,
        }
    }

    /// Place a gamepiece in view at the given offsets (degrees) and area
    /// (percent of the image), or remove it with `None`.
    pub fn set_gamepiece(&mut self, gamepiece: Option<(f64, f64, f64)>) {
        self.gamepiece = gamepiece.map(|(tx, ty, ta)| TargetReadings { tv: 1.0, tx, ty, ta });
    }

    /// The last orientation published to the camera.
    pub fn robot_orientation(&self) -> [f64; 6] {
        self.orientation
    }

    /// Advance the camera by `dt_s` seconds.
    pub fn step(&mut self, dt_s: f64) {
        self.time_us += (dt_s * 1e6).round() as i64;
        self.num_steps += 1;

        self.latest = None;

        if self.pipeline != Pipeline::DefaultAprilTag || self.num_steps % self.period_cycles != 0 {
            return;
        }

        self.latest = Some(TimestampedArray {
            value: vec![
                self.true_pose.position_m.x,
                self.true_pose.position_m.y,
                0.0,
                0.0,
                0.0,
                self.true_pose.get_heading_deg(),
                SIM_LATENCY_MS,
                2.0,
                0.8,
                2.5,
                0.4,
            ],
            timestamp_us: self.time_us,
        });
    }
}

impl VisionSource for SimVision {
    fn pose_array(&mut self) -> Option<TimestampedArray> {
        self.latest.clone()
    }

    fn target_readings(&mut self) -> TargetReadings {
        match (self.pipeline, self.gamepiece) {
            (Pipeline::Gamepiece, Some(r)) => r,
            _ => TargetReadings::default(),
        }
    }

    fn set_pipeline(&mut self, pipeline: Pipeline) {
        self.pipeline = pipeline;
    }

    fn current_pipeline(&self) -> Pipeline {
        self.pipeline
    }

    fn set_robot_orientation(&mut self, orientation: [f64; 6]) {
        self.orientation = orientation;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::vision::PoseEstimate;

    #[test]
    fn test_publishing() {
        let mut cam = SimVision::new(Pose::new(3.0, 4.0, 45.0), 2);

        cam.step(0.02);
        cam.step(0.02);
        assert_eq!(cam.pose_array(), None);

        cam.set_pipeline(Pipeline::DefaultAprilTag);
        cam.step(0.02);
        assert_eq!(cam.pose_array(), None);
        cam.step(0.02);

        let est = PoseEstimate::from_array(&cam.pose_array().unwrap()).unwrap();
        assert_eq!(est.position_m.x, 3.0);
        assert!((est.heading_deg - 45.0).abs() < 1e-9);
        assert!((est.timestamp_s - 0.06).abs() < 1e-9);
    }

    #[test]
    fn test_gamepiece_target() {
        let mut cam = SimVision::new(Pose::new(0.0, 0.0, 0.0), 1);
        cam.set_gamepiece(Some((3.0, -1.0, 2.5)));

        // Not visible to the AprilTag pipeline
        cam.set_pipeline(Pipeline::DefaultAprilTag);
        assert_eq!(cam.target_readings(), TargetReadings::default());

        cam.set_pipeline(Pipeline::Gamepiece);
        let r = cam.target_readings();
        assert_eq!((r.tv, r.tx, r.ty, r.ta), (1.0, 3.0, -1.0, 2.5));

        cam.set_gamepiece(None);
        assert_eq!(cam.target_readings().tv, 0.0);
    }
}
