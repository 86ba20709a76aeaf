//! Module interfaces
//!
//! Each cyclic controller in `robot_exec` shall implement the [`State`] trait
//! so the main loop can initialise and step it the same way.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// MODULE STATE
// ---------------------------------------------------------------------------

/// The module's internal state.
pub trait State {
    /// Data required during initialisation
    type InitData;
    /// An error which can occur during initialisation.
    type InitError;

    /// Data required for cyclic processing.
    type InputData;
    /// Data produced by cyclic processing.
    type OutputData;
    /// A report on the status of the cyclic processing.
    type StatusReport;
    /// An error which can occur during cyclic processing. Controllers which
    /// must never fault use `std::convert::Infallible`.
    type ProcError;

    /// Initialise the module, optionally creating archives in the session.
    fn init(&mut self, init_data: Self::InitData, session: Option<&Session>)
        -> Result<(), Self::InitError>;

    /// Main module processing function, called once per cycle.
    ///
    /// # Outputs
    /// - On success a tuple of the output data and status report.
    /// - On error a `ProcError` instance.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>;
}
