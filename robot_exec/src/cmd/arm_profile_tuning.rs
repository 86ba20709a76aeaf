//! Motion profile tuning of the arm.
//!
//! While enabled the arm follows a motion profile from its measured state to
//! the setpoint, at rest. The profile is generated by a [`MotionProfile`].

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::debug;
use serde::Serialize;

use super::Command;
use crate::{arm_ctrl::ArmCtrl, CYCLE_PERIOD_S};
use comms_if::tc::RobotMode;
use util::maths::clamp;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Units: degrees/second
pub const DEFAULT_MAX_VELOCITY_DEGS: f64 = 30.0;

/// Units: degrees/second^2
pub const DEFAULT_MAX_ACCELERATION_DEGSS: f64 = 30.0;

/// Units: degrees
pub const DEFAULT_PROFILE_SETPOINT_DEG: f64 = 30.0;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Generates the next state of a motion towards a goal.
pub trait MotionProfile {
    /// Calculate the state `dt_s` seconds on from `current` when moving
    /// towards `goal` within `constraints`.
    fn calculate(
        &self,
        dt_s: f64,
        current: ProfileState,
        goal: ProfileState,
        constraints: &ProfileConstraints,
    ) -> ProfileState;
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A position and velocity along a profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ProfileState {
    pub position: f64,
    pub velocity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfileConstraints {
    pub max_velocity: f64,
    pub max_acceleration: f64,
}

/// Profile which limits the velocity, and the change in velocity, each step.
///
/// The velocity is also limited so that the motion can come to rest at the
/// goal without exceeding the maximum acceleration.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateLimitedProfile;

pub struct ArmProfileTuning<P: MotionProfile = RateLimitedProfile> {
    profile: P,
    enabled: bool,
    constraints: ProfileConstraints,
    goal: ProfileState,
    next: Option<ProfileState>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for ProfileConstraints {
    fn default() -> Self {
        Self {
            max_velocity: DEFAULT_MAX_VELOCITY_DEGS,
            max_acceleration: DEFAULT_MAX_ACCELERATION_DEGSS,
        }
    }
}

impl MotionProfile for RateLimitedProfile {
    fn calculate(
        &self,
        dt_s: f64,
        current: ProfileState,
        goal: ProfileState,
        constraints: &ProfileConstraints,
    ) -> ProfileState {
        let max_vel = constraints.max_velocity.abs();
        let max_acc = constraints.max_acceleration.abs();

        let dist = goal.position - current.position;

        // Fastest speed from which we can still stop at the goal
        let stopping_vel = (2.0 * max_acc * dist.abs()).sqrt();

        let desired_vel = clamp(
            &(dist / dt_s),
            &-max_vel.min(stopping_vel),
            &max_vel.min(stopping_vel),
        );

        let velocity = clamp(
            &desired_vel,
            &(current.velocity - max_acc * dt_s),
            &(current.velocity + max_acc * dt_s),
        );

        let position = current.position + velocity * dt_s;

        // Never step past the goal
        if (goal.position - position) * dist < 0.0 {
            return goal;
        }

        ProfileState { position, velocity }
    }
}

impl Default for ArmProfileTuning<RateLimitedProfile> {
    fn default() -> Self {
        Self::new(RateLimitedProfile)
    }
}

impl<P: MotionProfile> ArmProfileTuning<P> {
    pub fn new(profile: P) -> Self {
        Self {
            profile,
            enabled: false,
            constraints: ProfileConstraints::default(),
            goal: ProfileState {
                position: DEFAULT_PROFILE_SETPOINT_DEG,
                velocity: 0.0,
            },
            next: None,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable tuning.
    ///
    /// Requests outside of teleop, or which don't change the state, are
    /// ignored.
    pub fn set_enabled(&mut self, enabled: bool, robot_mode: RobotMode) {
        if enabled == self.enabled || robot_mode != RobotMode::Teleop {
            return;
        }
        self.enabled = enabled;

        debug!("Arm profile tuning enabled: {}", enabled);
    }

    pub fn setpoint_deg(&self) -> f64 {
        self.goal.position
    }

    pub fn set_setpoint(&mut self, position_deg: f64) {
        self.goal = ProfileState {
            position: position_deg,
            velocity: 0.0,
        };
    }

    pub fn constraints(&self) -> ProfileConstraints {
        self.constraints
    }

    pub fn set_constraints(&mut self, constraints: ProfileConstraints) {
        if constraints != self.constraints {
            debug!("Arm profile constraints: {:?}", constraints);
            self.constraints = constraints;
        }
    }

    /// The state commanded on the last execution, if enabled.
    pub fn next_state(&self) -> Option<ProfileState> {
        self.next
    }
}

impl<P: MotionProfile> Command for ArmProfileTuning<P> {
    type Subsystem = ArmCtrl;

    fn execute(&mut self, arm: &mut ArmCtrl) {
        if self.enabled {
            let current = ProfileState {
                position: arm.current_position(),
                velocity: arm.current_velocity(),
            };

            let next =
                self.profile
                    .calculate(CYCLE_PERIOD_S, current, self.goal, &self.constraints);

            arm.set_target_position_and_velocity(next.position, next.velocity);
            self.next = Some(next);
        }
        else {
            self.next = None;
            arm.set_target_output(0.0);
        }
    }

    fn end(&mut self, arm: &mut ArmCtrl) {
        self.next = None;
        arm.set_target_output(0.0);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::arm_ctrl::test::homed_arm;
    use crate::setpoint::SetpointMode;

    #[test]
    fn test_rate_limited_profile() {
        let profile = RateLimitedProfile;
        let constraints = ProfileConstraints {
            max_velocity: 30.0,
            max_acceleration: 30.0,
        };
        let goal = ProfileState { position: 90.0, velocity: 0.0 };

        // Acceleration limited from rest
        let next = profile.calculate(0.02, ProfileState::default(), goal, &constraints);
        assert!((next.velocity - 0.6).abs() < 1e-9);
        assert!((next.position - 0.012).abs() < 1e-9);

        // Velocity limited when cruising
        let cruise = ProfileState { position: 10.0, velocity: 30.0 };
        let next = profile.calculate(0.02, cruise, goal, &constraints);
        assert!((next.velocity - 30.0).abs() < 1e-9);

        // Run the profile to completion, it must settle on the goal without
        // overshooting
        let mut state = ProfileState::default();
        for _ in 0..1000 {
            state = profile.calculate(0.02, state, goal, &constraints);
            assert!(state.position <= 90.0 + 1e-9);
            assert!(state.velocity.abs() <= 30.0 + 1e-9);
        }
        assert!((state.position - 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_execute() {
        let mut arm = homed_arm();
        let mut cmd = ArmProfileTuning::default();

        cmd.execute(&mut arm);
        assert_eq!(cmd.next_state(), None);
        assert_eq!(arm.mode(), SetpointMode::RawOutput(0.0));

        cmd.set_enabled(true, RobotMode::Teleop);
        cmd.execute(&mut arm);
        let next = cmd.next_state().unwrap();
        assert_eq!(arm.mode().target_position(), Some(next.position));
        assert_eq!(arm.mode().target_velocity(), Some(next.velocity));

        cmd.end(&mut arm);
        assert_eq!(cmd.next_state(), None);
        assert_eq!(arm.mode(), SetpointMode::RawOutput(0.0));
    }
}
