//! Implementations for the ArmCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, trace, warn};
use serde::Serialize;
use std::convert::Infallible;

// Internal
use super::{ArmCtrlError, ArmGains, Params};
use crate::setpoint::{
    self, ActuatorState, ArmFeedforward, LimitReason, SafetyBounds, SetpointMode,
};
use comms_if::eqpt::mech::{ActuatorSens, IdleMode, MotorDem, MotorDems};
use util::{
    archive::{Archived, Archiver, ArchiveError},
    maths::wrap_half_rotation,
    module::State,
    params,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Arm control module state
#[derive(Default)]
pub struct ArmCtrl {
    pub(crate) params: Params,

    bounds: SafetyBounds,

    k_p: f64,

    feedforward: ArmFeedforward,

    brake_enabled: bool,

    mode: SetpointMode,

    homing: HomingState,

    state: ActuatorState,

    last_feedforward: f64,

    report: StatusReport,

    arch_report: Archiver,
}

/// Input data to Arm Control.
#[derive(Debug, Default, Clone, Copy)]
pub struct InputData {
    /// Sensor data read from the arm's lead motor controller this cycle.
    pub sens: ActuatorSens,
}

/// Status report for ArmCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    pub homed: bool,

    /// Set if the safety limiter zeroed the open loop output this cycle.
    pub limit: LimitReason,

    pub at_setpoint: bool,

    pub position_deg: f64,
    pub velocity_degs: f64,
    pub current_a: f64,

    pub target_output: Option<f64>,
    pub target_position_deg: Option<f64>,
    pub target_velocity_degs: Option<f64>,

    /// Units: volts
    pub feedforward_v: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Alignment of the relative encoder to the absolute encoder.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum HomingState {
    Uninitialised,
    Homed,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for HomingState {
    fn default() -> Self {
        HomingState::Uninitialised
    }
}

impl State for ArmCtrl {
    type InitData = &'static str;
    type InitError = ArmCtrlError;

    type InputData = InputData;
    type OutputData = MotorDems;
    type StatusReport = StatusReport;
    type ProcError = Infallible;

    /// Initialise the ArmCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(
        &mut self,
        init_data: Self::InitData,
        session: Option<&Session>,
    ) -> Result<(), Self::InitError> {
        let params: Params = params::load(init_data).map_err(ArmCtrlError::ParamLoadError)?;

        *self = Self::from_params(params)?;

        if let Some(session) = session {
            self.arch_report = Archiver::from_path(session, "arm_ctrl/status_report.csv")
                .map_err(ArmCtrlError::ArchiveError)?;
        }

        Ok(())
    }

    /// Perform cyclic processing of Arm Control.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        // Clear the status report
        self.report = StatusReport::default();

        let mut output = MotorDems::stop(IdleMode::from_brake(self.brake_enabled));

        // Home the relative encoder on the first cycle only. The reset is
        // applied by the motor controller before this cycle's demand, so the
        // reset position is used as this cycle's measurement.
        let pos_rot = match self.homing {
            HomingState::Uninitialised => {
                self.homing = HomingState::Homed;

                match self.homing_position_rot(&input_data.sens) {
                    Some(r) => {
                        info!(
                            "Arm homed to {:.2} deg (encoder reset to {:.4} rot)",
                            r * self.params.degrees_per_rotation,
                            r
                        );
                        output.encoder_reset_rot = Some(r);
                        r
                    }
                    None => {
                        warn!("No absolute encoder reading, arm relative encoder not homed");
                        input_data.sens.pos_rot
                    }
                }
            }
            HomingState::Homed => input_data.sens.pos_rot,
        };

        self.state = ActuatorState {
            position: pos_rot * self.params.degrees_per_rotation,
            velocity: input_data.sens.vel_rpm * self.params.degrees_per_rotation / 60.0,
            current_a: input_data.sens.current_a,
        };

        output.dem = match self.mode {
            SetpointMode::RawOutput(requested) => {
                let (applied, reason) =
                    setpoint::limit(requested, self.state.position, &self.bounds);

                if reason != LimitReason::None {
                    trace!(
                        "Arm output limited at {} ({:.2} deg, requested {:.2})",
                        reason,
                        self.state.position,
                        requested
                    );
                }
                self.report.limit = reason;

                MotorDem::Output(applied)
            }
            SetpointMode::ClosedLoop { position, velocity } => {
                self.last_feedforward = self
                    .feedforward
                    .calculate(self.state.position.to_radians(), velocity);

                match position {
                    Some(p) => MotorDem::Position {
                        pos_rot: p / self.params.degrees_per_rotation,
                        k_p: self.k_p,
                        arb_ff_v: self.last_feedforward,
                    },
                    None => MotorDem::Velocity {
                        vel_rpm: velocity * 60.0 / self.params.degrees_per_rotation,
                        k_p: self.k_p,
                        arb_ff_v: self.last_feedforward,
                    },
                }
            }
        };

        self.update_report();

        Ok((output, self.report))
    }
}

impl Archived for ArmCtrl {
    fn write(&mut self) -> Result<(), ArchiveError> {
        self.arch_report.serialise(self.report)
    }
}

impl ArmCtrl {
    /// Create a new arm controller from a set of parameters.
    pub fn from_params(params: Params) -> Result<Self, ArmCtrlError> {
        let bounds = SafetyBounds::new(params.min_pos_deg, params.max_pos_deg)
            .map_err(ArmCtrlError::InvalidBounds)?;

        if !(params.degrees_per_rotation.is_finite() && params.degrees_per_rotation > 0.0) {
            return Err(ArmCtrlError::InvalidParam(format!(
                "degrees_per_rotation must be positive, got {}",
                params.degrees_per_rotation
            )));
        }
        if params.tolerance_deg.is_nan() || params.tolerance_deg < 0.0 {
            return Err(ArmCtrlError::InvalidParam(format!(
                "tolerance_deg must not be negative, got {}",
                params.tolerance_deg
            )));
        }

        let gains = params.gains;

        Ok(Self {
            bounds,
            k_p: gains.k_p,
            feedforward: ArmFeedforward::new(0.0, gains.k_g, gains.k_v),
            brake_enabled: params.brake_enabled,
            params,
            ..Default::default()
        })
    }

    /// Command an open loop output, clearing any closed loop target.
    pub fn set_target_output(&mut self, output: f64) {
        let mode = SetpointMode::raw(output);
        self.set_mode(mode);
    }

    /// Command the arm to hold a position, clamped into the safety bounds.
    pub fn set_target_position(&mut self, position_deg: f64) {
        self.set_target_position_and_velocity(position_deg, 0.0);
    }

    /// Command the arm to track a position and velocity. The position is
    /// clamped into the safety bounds.
    ///
    /// A non-finite position is ignored and the current setpoint kept.
    pub fn set_target_position_and_velocity(&mut self, position_deg: f64, velocity_degs: f64) {
        if !position_deg.is_finite() {
            warn!("Ignoring non-finite arm target position {}", position_deg);
            return;
        }

        let velocity = if velocity_degs.is_finite() {
            velocity_degs
        }
        else {
            0.0
        };

        self.set_mode(SetpointMode::ClosedLoop {
            position: Some(self.bounds.clamp(position_deg)),
            velocity,
        });
    }

    /// True only when a position target is active and the arm is within
    /// tolerance of it.
    pub fn is_at_setpoint(&self) -> bool {
        self.mode
            .is_at_position(self.state.position, self.params.tolerance_deg)
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn mode(&self) -> SetpointMode {
        self.mode
    }

    pub fn homing_state(&self) -> HomingState {
        self.homing
    }

    pub fn bounds(&self) -> SafetyBounds {
        self.bounds
    }

    /// Position measured on the last cycle.
    ///
    /// Units: degrees
    pub fn current_position(&self) -> f64 {
        self.state.position
    }

    /// Velocity measured on the last cycle.
    ///
    /// Units: degrees/second
    pub fn current_velocity(&self) -> f64 {
        self.state.velocity
    }

    pub fn last_feedforward(&self) -> f64 {
        self.last_feedforward
    }

    pub fn gains(&self) -> ArmGains {
        ArmGains {
            k_p: self.k_p,
            k_g: self.feedforward.k_g,
            k_v: self.feedforward.k_v,
        }
    }

    pub fn k_p(&self) -> f64 {
        self.k_p
    }

    pub fn set_k_p(&mut self, k_p: f64) {
        debug!("Arm k_p: {} -> {}", self.k_p, k_p);
        self.k_p = k_p;
    }

    pub fn k_g(&self) -> f64 {
        self.feedforward.k_g
    }

    pub fn set_k_g(&mut self, k_g: f64) {
        debug!("Arm k_g: {} -> {}", self.feedforward.k_g, k_g);
        self.feedforward.k_g = k_g;
    }

    pub fn k_v(&self) -> f64 {
        self.feedforward.k_v
    }

    pub fn set_k_v(&mut self, k_v: f64) {
        debug!("Arm k_v: {} -> {}", self.feedforward.k_v, k_v);
        self.feedforward.k_v = k_v;
    }

    pub fn brake_enabled(&self) -> bool {
        self.brake_enabled
    }

    pub fn set_brake_enabled(&mut self, enabled: bool) {
        if enabled != self.brake_enabled {
            debug!("Arm brake enabled: {}", enabled);
        }
        self.brake_enabled = enabled;
    }

    /// Function called when entering safe mode.
    ///
    /// Must result in no motion of the arm.
    pub fn make_safe(&mut self) {
        self.set_target_output(0.0);
    }

    fn set_mode(&mut self, mode: SetpointMode) {
        if std::mem::discriminant(&mode) != std::mem::discriminant(&self.mode) {
            debug!("Arm mode {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
    }

    /// Relative encoder position matching the absolute encoder reading.
    ///
    /// Units: motor rotations
    fn homing_position_rot(&self, sens: &ActuatorSens) -> Option<f64> {
        let abs_rot = sens.abs_pos_rot?;
        if !abs_rot.is_finite() {
            return None;
        }

        let arm_rot = wrap_half_rotation(abs_rot - self.params.encoder_offset_rot);

        Some(arm_rot * 360.0 / self.params.degrees_per_rotation)
    }

    fn update_report(&mut self) {
        self.report.homed = self.homing == HomingState::Homed;
        self.report.at_setpoint = self.is_at_setpoint();
        self.report.position_deg = self.state.position;
        self.report.velocity_degs = self.state.velocity;
        self.report.current_a = self.state.current_a;
        self.report.target_output = self.mode.raw_output();
        self.report.target_position_deg = self.mode.target_position();
        self.report.target_velocity_degs = self.mode.target_velocity();
        self.report.feedforward_v = match self.mode {
            SetpointMode::RawOutput(_) => 0.0,
            SetpointMode::ClosedLoop { .. } => self.last_feedforward,
        };
    }
}
