//! # Robot script interpreter module
//!
//! This module provides an interpreter for robot scripts, allowing
//! telecommands to be replayed into the control loop at set times.
//!
//! A script is a sequence of entries of the form `<time_s>: <tc_json>;`, for
//! example:
//!
//! ```text
//! 0.5: {"type": "SET_MODE", "payload": "Teleop"};
//! 1.0: {"type": "ARM_INPUT", "payload": 0.4};
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::fs;
use regex::RegexBuilder;
use thiserror::Error;

// Internal
use comms_if::tc::{Tc, TcParseError};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Matches one `<time>: <payload>;` entry per line.
const ENTRY_PATTERN: &str = r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A command which is scripted to occur at a specific time.
#[derive(Debug)]
struct Command {
    /// The time the command is supposed to execute at
    exec_time_s: f64,

    /// The Telecommand to run
    tc: Tc
}

/// A script interpreter.
///
/// After initialising with the path to the script to run use
/// `.get_pending_tcs_at` to acquire a list of telecommands that need
/// executing.
pub struct ScriptInterpreter {
    _script_path: PathBuf,
    cmds: VecDeque<Command>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0:?}")]
    ScriptNotFound(PathBuf),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)")]
    InvalidTimestamp(String),

    #[error("Script contains an invalid TC at {0} s: {1}")]
    InvalidTc(f64, TcParseError)
}

#[derive(Debug)]
pub enum PendingTcs {
    None,
    Some(Vec<Tc>),
    EndOfScript
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScriptInterpreter {

    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {

        let path = PathBuf::from(script_path.as_ref());

        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(path));
        }

        let script = fs::read_to_string(&path).map_err(ScriptError::ScriptLoadError)?;

        let mut si = Self::from_script(&script)?;
        si._script_path = path;

        Ok(si)
    }

    /// Create a new interpreter from the contents of a script.
    pub fn from_script(script: &str) -> Result<Self, ScriptError> {
        let mut tc_queue: VecDeque<Command> = VecDeque::new();

        let re = RegexBuilder::new(ENTRY_PATTERN)
            .multi_line(true)
            .build()
            .expect("script entry pattern is a valid regex");

        for cap in re.captures_iter(script) {
            let exec_time_s: f64 = cap[1]
                .parse()
                .map_err(|e| ScriptError::InvalidTimestamp(format!("{}", e)))?;

            // The scripts contain JSON only.
            let tc = Tc::from_json(&cap[3])
                .map_err(|e| ScriptError::InvalidTc(exec_time_s, e))?;

            tc_queue.push_back(Command {
                exec_time_s,
                tc
            });
        }

        if tc_queue.is_empty() {
            return Err(ScriptError::ScriptEmpty)
        }

        // Scripts are allowed to be written out of order
        tc_queue
            .make_contiguous()
            .sort_by(|a, b| a.exec_time_s.total_cmp(&b.exec_time_s));

        Ok(ScriptInterpreter {
            _script_path: PathBuf::new(),
            cmds: tc_queue
        })
    }

    /// Return a vector of TCs due at or before `current_time_s`.
    pub fn get_pending_tcs_at(&mut self, current_time_s: f64) -> PendingTcs {

        // If the queue is empty the script is over
        if self.cmds.is_empty() {
            return PendingTcs::EndOfScript
        }

        let mut tc_vec: Vec<Tc> = vec![];

        while let Some(c) = self.cmds.front() {
            if c.exec_time_s > current_time_s {
                break;
            }

            if let Some(c) = self.cmds.pop_front() {
                tc_vec.push(c.tc);
            }
        }

        if tc_vec.is_empty() {
            PendingTcs::None
        }
        else {
            PendingTcs::Some(tc_vec)
        }
    }

    /// Get the number of TCs remaining in the script
    pub fn get_num_tcs(&self) -> usize {
        self.cmds.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.cmds.back() {
            Some(c) => c.exec_time_s,
            None => 0f64
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::tc::RobotMode;

    const SCRIPT: &str = "
        1.0: {\"type\": \"ARM_INPUT\", \"payload\": 0.5};
        0.5: {\"type\": \"SET_MODE\", \"payload\": \"Teleop\"};
        2.0: {\"type\": \"SET_MODE\", \"payload\": \"Disabled\"};
    ";

    #[test]
    fn test_script_ordering() {
        let mut si = ScriptInterpreter::from_script(SCRIPT).unwrap();

        assert_eq!(si.get_num_tcs(), 3);
        assert_eq!(si.get_duration(), 2.0);

        assert!(matches!(si.get_pending_tcs_at(0.1), PendingTcs::None));

        match si.get_pending_tcs_at(1.0) {
            PendingTcs::Some(tcs) => {
                assert_eq!(tcs.len(), 2);
                assert_eq!(tcs[0], Tc::SetMode(RobotMode::Teleop));
                assert_eq!(tcs[1], Tc::ArmInput(0.5));
            }
            p => panic!("Expected two pending TCs, got {:?}", p),
        }

        assert!(matches!(si.get_pending_tcs_at(5.0), PendingTcs::Some(_)));
        assert!(matches!(si.get_pending_tcs_at(5.0), PendingTcs::EndOfScript));
    }

    #[test]
    fn test_empty_script() {
        assert!(matches!(
            ScriptInterpreter::from_script("# nothing here"),
            Err(ScriptError::ScriptEmpty)
        ));
    }

    #[test]
    fn test_invalid_tc() {
        assert!(matches!(
            ScriptInterpreter::from_script("1.0: {\"type\": \"WARP_DRIVE\"};"),
            Err(ScriptError::InvalidTc(_, _))
        ));
    }
}
