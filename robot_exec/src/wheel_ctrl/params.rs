//! Parameters structure for WheelCtrl

use serde::{Deserialize, Serialize};

/// Parameters for a wheel controller.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Params {
    /// Wheel rotations per motor rotation.
    pub gear_ratio: f64,

    /// Units: feet
    pub wheel_circumference_ft: f64,

    /// Closed loop targets are clamped to this magnitude.
    ///
    /// Units: rotations/minute
    pub max_rpm: f64,

    /// Initial gains, these may be changed at runtime.
    pub gains: WheelGains,

    /// True if the motor shall brake when idle.
    pub brake_enabled: bool,
}

/// Runtime tunable gains of a wheel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelGains {
    /// Proportional gain of the on-controller velocity loop.
    pub k_p: f64,

    /// Velocity feedforward.
    ///
    /// Units: volts/(rotation/minute)
    pub k_v: f64,
}
