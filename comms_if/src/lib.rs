//! # Communications interface crate.
//!
//! Provides the interface types shared between the control executable and
//! the equipment it drives or is driven by.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Telecommand definitions
pub mod tc;

/// Demand and sensing definitions for equipment (motors, vision)
pub mod eqpt;
