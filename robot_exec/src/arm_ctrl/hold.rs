//! Hold position policy for the arm.
//!
//! When the operator's input is neutral and the arm is raised the arm shall
//! be held at the position it was at when the input first went neutral,
//! rather than being left to fall under zero output.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::debug;
use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The hold state machine.
#[derive(Debug, Clone, Copy)]
pub struct HoldPolicy {
    state: HoldState,

    /// The arm is only held above this position.
    ///
    /// Units: degrees
    min_pos_for_hold_deg: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum HoldState {
    Released,

    /// Holding at the latched position (degrees).
    Holding(f64),
}

/// What the arm shall be commanded to do this cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoldAction {
    /// Hold a position (degrees) in closed loop.
    Hold(f64),

    /// Apply an open loop output.
    Output(f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl HoldPolicy {
    pub fn new(min_pos_for_hold_deg: f64) -> Self {
        Self {
            state: HoldState::Released,
            min_pos_for_hold_deg,
        }
    }

    pub fn state(&self) -> HoldState {
        self.state
    }

    /// Release any latched position.
    pub fn reset(&mut self) {
        self.state = HoldState::Released;
    }

    /// Step the policy with this cycle's (deadbanded and clamped) output and
    /// the measured arm position.
    ///
    /// The latch is taken once per neutral input episode, later cycles keep
    /// the latched position even if the arm drifts.
    pub fn update(&mut self, output: f64, measured_deg: f64) -> HoldAction {
        if output == 0.0 && measured_deg > self.min_pos_for_hold_deg {
            let pos = match self.state {
                HoldState::Holding(p) => p,
                HoldState::Released => {
                    debug!("Arm hold latched at {:.2} deg", measured_deg);
                    self.state = HoldState::Holding(measured_deg);
                    measured_deg
                }
            };

            HoldAction::Hold(pos)
        }
        else {
            if let HoldState::Holding(_) = self.state {
                debug!("Arm hold released");
            }
            self.state = HoldState::Released;

            HoldAction::Output(output)
        }
    }

    /// Step the policy when the owning command ends.
    ///
    /// A raised arm is held where it is, otherwise the output is zeroed.
    pub fn end(&mut self, measured_deg: f64) -> HoldAction {
        if measured_deg > self.min_pos_for_hold_deg {
            self.state = HoldState::Holding(measured_deg);
            HoldAction::Hold(measured_deg)
        }
        else {
            self.state = HoldState::Released;
            HoldAction::Output(0.0)
        }
    }
}
