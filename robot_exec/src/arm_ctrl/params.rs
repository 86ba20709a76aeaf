//! Parameters structure for ArmCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for Arm control.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Params {
    // ---- CAPABILITIES ----
    /// Lowest safe arm position.
    ///
    /// Units: degrees
    pub min_pos_deg: f64,

    /// Highest safe arm position.
    ///
    /// Units: degrees
    pub max_pos_deg: f64,

    /// The arm is at its setpoint when closer than this to the target.
    ///
    /// Units: degrees
    pub tolerance_deg: f64,

    // ---- GEOMETRY ----
    /// Arm rotation per rotation of the motor's relative encoder.
    ///
    /// Units: degrees/rotation
    pub degrees_per_rotation: f64,

    /// Reading of the absolute encoder when the arm is at zero degrees.
    ///
    /// Units: rotations
    pub encoder_offset_rot: f64,

    // ---- TUNING ----
    /// Initial gains, these may be changed at runtime.
    pub gains: ArmGains,

    /// True if the motors shall brake when idle.
    pub brake_enabled: bool,
}

/// Runtime tunable gains of the arm.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmGains {
    /// Proportional gain of the on-controller position loop.
    pub k_p: f64,

    /// Gravity feedforward.
    ///
    /// Units: volts
    pub k_g: f64,

    /// Velocity feedforward.
    ///
    /// Units: volts/(degree/second)
    pub k_v: f64,
}
