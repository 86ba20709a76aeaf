//! # Robot library.
//!
//! This library allows other crates in the workspace (and the benchmarks) to access items defined
//! inside the robot crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Arm control module - drives the arm motor to an output, position or velocity
pub mod arm_ctrl;

/// Commands which drive the subsystems from operator input or tuning setpoints
pub mod cmd;

/// Global data store
pub mod data_store;

/// Localisation module - fuses pose estimates into the robot's idea of where it is
pub mod loc;

/// Common setpoint types and the safety limiter
pub mod setpoint;

/// Simulated motors and camera
pub mod sim;

/// Telecommand processor
pub mod tc_processor;

/// Telemetry snapshot
pub mod tm;

/// Vision pose estimate decoding
pub mod vision;

/// Wheel control module - drives the shooter and intake wheels
pub mod wheel_ctrl;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Target period of one cycle.
pub const CYCLE_PERIOD_S: f64 = 0.02;

/// Number of cycles per second
pub const CYCLE_FREQUENCY_HZ: f64 = 1.0 / CYCLE_PERIOD_S;
