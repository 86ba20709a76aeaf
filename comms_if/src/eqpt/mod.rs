//! # Equipment Interface
//!
//! This module defines the interface structures exchanged with the robot's
//! equipment: motor controllers and the vision camera.

/// Motor controller demands and sensor readings
pub mod mech;

/// Raw vision telemetry
pub mod vision;
