//! Host platform utility functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::env;
use std::path::PathBuf;
use thiserror::Error;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Environment variable pointing at the root of the software checkout. The
/// `params` and `sessions` directories are resolved relative to it.
pub const SW_ROOT_ENV_VAR: &str = "ROBOT_SW_ROOT";

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum HostError {
    #[error("The software root environment variable ({0}) is not set")]
    SwRootNotSet(&'static str),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the software root directory from the environment.
pub fn get_sw_root() -> Result<PathBuf, HostError> {
    match env::var_os(SW_ROOT_ENV_VAR) {
        Some(p) => Ok(PathBuf::from(p)),
        None => Err(HostError::SwRootNotSet(SW_ROOT_ENV_VAR))
    }
}

/// Get the name of the host machine, or `"unknown"` if it can't be determined.
pub fn get_hostname() -> String {
    env::var("HOSTNAME")
        .or_else(|_| env::var("COMPUTERNAME"))
        .unwrap_or_else(|_| String::from("unknown"))
}
