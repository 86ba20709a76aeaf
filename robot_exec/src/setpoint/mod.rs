//! # Setpoint module
//!
//! Types shared by the arm and wheel controllers: the mutually exclusive
//! open/closed loop setpoint, the actuator's safety bounds, the open loop
//! safety limiter, and the feedforward models.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod feedforward;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
pub use feedforward::*;
use util::maths::clamp_norm;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Measured state of an actuator in device units, produced once per cycle
/// from the raw sensor reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ActuatorState {
    /// Position in device units (degrees for the arm).
    pub position: f64,

    /// Velocity in device units (degrees/second for the arm, rotations/minute
    /// for the wheels).
    pub velocity: f64,

    /// Units: amps
    pub current_a: f64,
}

/// Position bounds of an actuator. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SafetyBounds {
    min: f64,
    max: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The active setpoint of a controller.
///
/// Open loop output and closed loop targets are mutually exclusive, setting
/// one replaces the other.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SetpointMode {
    /// Open loop normalised output in `[-1, 1]`.
    RawOutput(f64),

    /// Closed loop target. Velocity-only controllers leave `position` unset.
    ClosedLoop {
        position: Option<f64>,
        velocity: f64,
    },
}

/// Which bound, if any, caused the limiter to zero the output.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum LimitReason {
    None,
    Min,
    Max,
}

#[derive(Debug, thiserror::Error)]
pub enum BoundsError {
    #[error("Bounds must be finite, got [{0}, {1}]")]
    NonFinite(f64, f64),

    #[error("Minimum bound ({0}) is greater than the maximum bound ({1})")]
    Inverted(f64, f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SafetyBounds {
    pub fn new(min: f64, max: f64) -> Result<Self, BoundsError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(BoundsError::NonFinite(min, max));
        }
        if min > max {
            return Err(BoundsError::Inverted(min, max));
        }

        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Clamp a position into the bounds.
    pub fn clamp(&self, position: f64) -> f64 {
        util::maths::clamp(&position, &self.min, &self.max)
    }
}

impl SetpointMode {
    /// Build an open loop setpoint, saturating the output into `[-1, 1]`.
    pub fn raw(output: f64) -> Self {
        SetpointMode::RawOutput(clamp_norm(output))
    }

    /// The open loop output, or `None` in closed loop.
    pub fn raw_output(&self) -> Option<f64> {
        match self {
            SetpointMode::RawOutput(o) => Some(*o),
            SetpointMode::ClosedLoop { .. } => None,
        }
    }

    /// The closed loop position target, or `None` if there isn't one.
    pub fn target_position(&self) -> Option<f64> {
        match self {
            SetpointMode::ClosedLoop { position, .. } => *position,
            SetpointMode::RawOutput(_) => None,
        }
    }

    /// The closed loop velocity target, or `None` in open loop.
    pub fn target_velocity(&self) -> Option<f64> {
        match self {
            SetpointMode::ClosedLoop { velocity, .. } => Some(*velocity),
            SetpointMode::RawOutput(_) => None,
        }
    }

    /// True if a closed loop position target is active and the measured
    /// position is strictly within `tolerance` of it.
    pub fn is_at_position(&self, measured: f64, tolerance: f64) -> bool {
        match self.target_position() {
            Some(target) => (measured - target).abs() < tolerance,
            None => false,
        }
    }
}

impl Default for SafetyBounds {
    fn default() -> Self {
        Self { min: 0.0, max: 0.0 }
    }
}

impl Default for SetpointMode {
    fn default() -> Self {
        SetpointMode::RawOutput(0.0)
    }
}

impl Default for LimitReason {
    fn default() -> Self {
        LimitReason::None
    }
}

impl std::fmt::Display for LimitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LimitReason::None => write!(f, ""),
            LimitReason::Min => write!(f, "MIN"),
            LimitReason::Max => write!(f, "MAX"),
        }
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Limit an open loop output so it can't drive the actuator further past its
/// bounds.
///
/// If the actuator is already below the minimum bound negative outputs are
/// zeroed, and likewise for positive outputs above the maximum bound. Outputs
/// which drive the actuator back towards its bounds are passed through.
pub fn limit(requested: f64, measured: f64, bounds: &SafetyBounds) -> (f64, LimitReason) {
    if measured < bounds.min && requested < 0.0 {
        (0.0, LimitReason::Min)
    }
    else if measured > bounds.max && requested > 0.0 {
        (0.0, LimitReason::Max)
    }
    else {
        (requested, LimitReason::None)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn arm_bounds() -> SafetyBounds {
        SafetyBounds::new(0.0, 105.0).unwrap()
    }

    #[test]
    fn test_limit() {
        let b = arm_bounds();

        assert_eq!(limit(-0.5, -1.0, &b), (0.0, LimitReason::Min));
        assert_eq!(limit(-0.5, 50.0, &b), (-0.5, LimitReason::None));
        assert_eq!(limit(0.5, 106.0, &b), (0.0, LimitReason::Max));

        // Driving back into bounds is allowed
        assert_eq!(limit(0.5, -1.0, &b), (0.5, LimitReason::None));
        assert_eq!(limit(-0.5, 106.0, &b), (-0.5, LimitReason::None));

        // Exactly on a bound is still inside
        assert_eq!(limit(-0.5, 0.0, &b), (-0.5, LimitReason::None));
        assert_eq!(limit(0.5, 105.0, &b), (0.5, LimitReason::None));
    }

    #[test]
    fn test_bounds() {
        assert!(matches!(SafetyBounds::new(10.0, 0.0), Err(BoundsError::Inverted(_, _))));
        assert!(matches!(
            SafetyBounds::new(f64::NAN, 0.0),
            Err(BoundsError::NonFinite(_, _))
        ));

        let b = arm_bounds();
        assert_eq!(b.clamp(-20.0), 0.0);
        assert_eq!(b.clamp(200.0), 105.0);
        assert_eq!(b.clamp(45.0), 45.0);
    }

    #[test]
    fn test_setpoint_mode() {
        let raw = SetpointMode::raw(2.0);
        assert_eq!(raw.raw_output(), Some(1.0));
        assert_eq!(raw.target_position(), None);
        assert_eq!(raw.target_velocity(), None);
        assert!(!raw.is_at_position(0.0, 2.0));

        let pos = SetpointMode::ClosedLoop { position: Some(30.0), velocity: 0.0 };
        assert_eq!(pos.raw_output(), None);
        assert!(pos.is_at_position(31.0, 2.0));
        assert!(!pos.is_at_position(32.0, 2.0));

        let vel = SetpointMode::ClosedLoop { position: None, velocity: 100.0 };
        assert_eq!(vel.target_velocity(), Some(100.0));
        assert!(!vel.is_at_position(0.0, 1e9));
    }
}
