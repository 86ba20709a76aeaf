//! Command which feeds vision pose estimates into localisation.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, info};

use super::{PoseEstimate, PoseSink, VisionSource};
use comms_if::eqpt::vision::Pipeline;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct PoseEstimateCmd {
    pipeline: Pipeline,

    has_pose: bool,

    /// Log the details of every accepted estimate.
    log: bool,

    last_estimate: Option<PoseEstimate>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for PoseEstimateCmd {
    fn default() -> Self {
        Self {
            pipeline: Pipeline::DefaultAprilTag,
            has_pose: false,
            log: false,
            last_estimate: None,
        }
    }
}

impl PoseEstimateCmd {
    /// True if a valid estimate was received on the last execution.
    pub fn has_pose(&self) -> bool {
        self.has_pose
    }

    /// The last valid estimate received, if any.
    pub fn last_estimate(&self) -> Option<PoseEstimate> {
        self.last_estimate
    }

    pub fn pipeline(&self) -> Pipeline {
        self.pipeline
    }

    /// Select the camera pipeline, applied immediately.
    pub fn set_pipeline(&mut self, pipeline: Pipeline, source: &mut dyn VisionSource) {
        if pipeline != self.pipeline {
            debug!("Vision pipeline {:?} -> {:?}", self.pipeline, pipeline);
        }
        self.pipeline = pipeline;
        source.set_pipeline(pipeline);
    }

    pub fn log_enabled(&self) -> bool {
        self.log
    }

    pub fn set_log(&mut self, log: bool) {
        self.log = log;
    }

    pub fn initialize(&mut self, source: &mut dyn VisionSource) {
        self.has_pose = false;
        self.last_estimate = None;
        source.set_pipeline(self.pipeline);
    }

    /// Poll the camera and forward any valid estimate to the sink.
    pub fn execute(&mut self, source: &mut dyn VisionSource, sink: &mut dyn PoseSink) {
        let estimate = match source.pose_array() {
            Some(array) => PoseEstimate::from_array(&array),
            None => None,
        };

        let estimate = match estimate {
            Some(e) => e,
            None => {
                self.has_pose = false;
                return;
            }
        };

        self.has_pose = true;
        self.last_estimate = Some(estimate);

        if self.log {
            info!("Pose estimate:");
            info!("    Timestamp: {:.3} s", estimate.timestamp_s);
            info!("    Latency: {:.3} ms", estimate.latency_ms);
            info!("    Tag count: {}", estimate.tag_count);
            info!("    Tag span: {:.2} m", estimate.tag_span_m);
            info!("    Average tag distance: {:.2} m", estimate.avg_tag_distance_m);
            info!("    Average tag area: {:.2} % of image", estimate.avg_tag_area_pct);
        }

        sink.accept_pose_estimate(&estimate);
    }

    pub fn end(&mut self) {
        self.has_pose = false;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::eqpt::vision::{TargetReadings, TimestampedArray};

    #[derive(Default)]
    struct FakeCamera {
        array: Option<TimestampedArray>,
        pipeline: Option<Pipeline>,
    }

    impl VisionSource for FakeCamera {
        fn pose_array(&mut self) -> Option<TimestampedArray> {
            self.array.clone()
        }

        fn set_pipeline(&mut self, pipeline: Pipeline) {
            self.pipeline = Some(pipeline);
        }

        fn current_pipeline(&self) -> Pipeline {
            self.pipeline.unwrap_or(Pipeline::Unknown)
        }

        fn target_readings(&mut self) -> TargetReadings {
            TargetReadings::default()
        }

        fn set_robot_orientation(&mut self, _orientation: [f64; 6]) {}
    }

    #[derive(Default)]
    struct Collector(Vec<PoseEstimate>);

    impl PoseSink for Collector {
        fn accept_pose_estimate(&mut self, estimate: &PoseEstimate) {
            self.0.push(*estimate);
        }
    }

    #[test]
    fn test_forwarding() {
        let mut cam = FakeCamera::default();
        let mut sink = Collector::default();
        let mut cmd = PoseEstimateCmd::default();

        cmd.initialize(&mut cam);
        assert_eq!(cam.current_pipeline(), Pipeline::DefaultAprilTag);

        // Nothing published
        cmd.execute(&mut cam, &mut sink);
        assert!(!cmd.has_pose());
        assert!(sink.0.is_empty());

        // Truncated array is not an estimate
        cam.array = Some(TimestampedArray {
            value: vec![1.0, 2.0, 3.0],
            timestamp_us: 1_000_000,
        });
        cmd.execute(&mut cam, &mut sink);
        assert!(!cmd.has_pose());
        assert!(sink.0.is_empty());

        cam.array = Some(TimestampedArray {
            value: vec![1.0, 2.0, 0.0, 0.0, 0.0, 30.0, 20.0, 4.0],
            timestamp_us: 5_000_000,
        });
        cmd.set_log(true);
        cmd.execute(&mut cam, &mut sink);
        assert!(cmd.has_pose());
        assert_eq!(sink.0.len(), 1);
        assert_eq!(sink.0[0].tag_count, 4);
        assert_eq!(cmd.last_estimate(), Some(sink.0[0]));

        cmd.end();
        assert!(!cmd.has_pose());
    }

    #[test]
    fn test_pipeline() {
        let mut cam = FakeCamera::default();
        let mut cmd = PoseEstimateCmd::default();

        cmd.set_pipeline(Pipeline::Gamepiece, &mut cam);
        assert_eq!(cmd.pipeline(), Pipeline::Gamepiece);
        assert_eq!(cam.current_pipeline(), Pipeline::Gamepiece);
    }
}
