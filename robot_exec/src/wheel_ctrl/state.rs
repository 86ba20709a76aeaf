//! Implementations for the WheelCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, warn};
use serde::Serialize;
use std::convert::Infallible;

// Internal
use super::{Params, WheelCtrlError, WheelGains};
use crate::setpoint::{ActuatorState, SetpointMode, SimpleMotorFeedforward};
use comms_if::{
    eqpt::mech::{ActuatorSens, IdleMode, MotorDem, MotorDems},
    tc::wheel_ctrl::WheelId,
};
use util::{
    archive::{Archived, Archiver, ArchiveError},
    maths::clamp,
    module::State,
    params,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Wheel control module state
pub struct WheelCtrl {
    id: WheelId,

    pub(crate) params: Params,

    k_p: f64,

    feedforward: SimpleMotorFeedforward,

    brake_enabled: bool,

    mode: SetpointMode,

    state: ActuatorState,

    last_feedforward: f64,

    report: StatusReport,

    arch_report: Archiver,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct InputData {
    pub sens: ActuatorSens,
}

/// Status report for WheelCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    pub velocity_rpm: f64,
    pub velocity_fps: f64,
    pub current_a: f64,

    pub target_output: Option<f64>,
    pub target_rpm: Option<f64>,

    /// Set if the requested velocity exceeded the maximum.
    pub rpm_limited: bool,

    /// Units: volts
    pub feedforward_v: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for WheelCtrl {
    type InitData = &'static str;
    type InitError = WheelCtrlError;

    type InputData = InputData;
    type OutputData = MotorDems;
    type StatusReport = StatusReport;
    type ProcError = Infallible;

    /// Initialise the WheelCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(
        &mut self,
        init_data: Self::InitData,
        session: Option<&Session>,
    ) -> Result<(), Self::InitError> {
        let params: Params = params::load(init_data).map_err(WheelCtrlError::ParamLoadError)?;

        *self = Self::from_params(self.id, params)?;

        if let Some(session) = session {
            self.arch_report = Archiver::from_path(
                session,
                format!("{}_ctrl/status_report.csv", self.id.as_str()),
            )
            .map_err(WheelCtrlError::ArchiveError)?;
        }

        Ok(())
    }

    /// Perform cyclic processing of Wheel Control.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        let rpm_limited = self.report.rpm_limited;
        self.report = StatusReport {
            rpm_limited,
            ..Default::default()
        };

        self.state = ActuatorState {
            position: input_data.sens.pos_rot * self.params.gear_ratio,
            velocity: input_data.sens.vel_rpm * self.params.gear_ratio,
            current_a: input_data.sens.current_a,
        };

        let mut output = MotorDems::stop(IdleMode::from_brake(self.brake_enabled));

        output.dem = match self.mode {
            SetpointMode::RawOutput(o) => MotorDem::Output(o),
            SetpointMode::ClosedLoop { velocity, .. } => {
                self.last_feedforward = self.feedforward.calculate(velocity);

                MotorDem::Velocity {
                    vel_rpm: velocity / self.params.gear_ratio,
                    k_p: self.k_p,
                    arb_ff_v: self.last_feedforward,
                }
            }
        };

        self.report.velocity_rpm = self.state.velocity;
        self.report.velocity_fps = self.current_fps();
        self.report.current_a = self.state.current_a;
        self.report.target_output = self.mode.raw_output();
        self.report.target_rpm = self.mode.target_velocity();
        if self.mode.target_velocity().is_some() {
            self.report.feedforward_v = self.last_feedforward;
        }

        Ok((output, self.report))
    }
}

impl Archived for WheelCtrl {
    fn write(&mut self) -> Result<(), ArchiveError> {
        self.arch_report.serialise(self.report)
    }
}

impl WheelCtrl {
    /// Create an uninitialised wheel controller, call `init` before use.
    pub fn new(id: WheelId) -> Self {
        Self {
            id,
            params: Params::default(),
            k_p: 0.0,
            feedforward: SimpleMotorFeedforward::default(),
            brake_enabled: false,
            mode: SetpointMode::default(),
            state: ActuatorState::default(),
            last_feedforward: 0.0,
            report: StatusReport::default(),
            arch_report: Archiver::default(),
        }
    }

    /// Create a new wheel controller from a set of parameters.
    pub fn from_params(id: WheelId, params: Params) -> Result<Self, WheelCtrlError> {
        if !(params.gear_ratio.is_finite() && params.gear_ratio > 0.0) {
            return Err(WheelCtrlError::InvalidParam(format!(
                "gear_ratio must be positive, got {}",
                params.gear_ratio
            )));
        }
        if !(params.max_rpm.is_finite() && params.max_rpm > 0.0) {
            return Err(WheelCtrlError::InvalidParam(format!(
                "max_rpm must be positive, got {}",
                params.max_rpm
            )));
        }

        let mut ctrl = Self::new(id);
        ctrl.k_p = params.gains.k_p;
        ctrl.feedforward = SimpleMotorFeedforward::new(0.0, params.gains.k_v);
        ctrl.brake_enabled = params.brake_enabled;
        ctrl.params = params;

        Ok(ctrl)
    }

    pub fn id(&self) -> WheelId {
        self.id
    }

    /// Command an open loop output, clearing any velocity target.
    pub fn set_target_output(&mut self, output: f64) {
        self.set_mode(SetpointMode::raw(output));
    }

    /// Command a velocity, clamped to the maximum wheel speed.
    ///
    /// A non-finite velocity is ignored and the current setpoint kept.
    pub fn set_target_velocity(&mut self, rpm: f64) {
        if !rpm.is_finite() {
            warn!("Ignoring non-finite {} target velocity {}", self.id.as_str(), rpm);
            return;
        }

        let max = self.params.max_rpm;
        let clamped = clamp(&rpm, &-max, &max);
        self.report.rpm_limited = clamped != rpm;

        self.set_mode(SetpointMode::ClosedLoop {
            position: None,
            velocity: clamped,
        });
    }

    pub fn mode(&self) -> SetpointMode {
        self.mode
    }

    /// Velocity measured on the last cycle.
    ///
    /// Units: rotations/minute
    pub fn current_rpm(&self) -> f64 {
        self.state.velocity
    }

    /// Surface speed of the wheel measured on the last cycle.
    ///
    /// Units: feet/second
    pub fn current_fps(&self) -> f64 {
        self.state.velocity * self.params.wheel_circumference_ft / 60.0
    }

    pub fn last_feedforward(&self) -> f64 {
        self.last_feedforward
    }

    pub fn gains(&self) -> WheelGains {
        WheelGains {
            k_p: self.k_p,
            k_v: self.feedforward.k_v,
        }
    }

    pub fn k_p(&self) -> f64 {
        self.k_p
    }

    pub fn set_k_p(&mut self, k_p: f64) {
        debug!("{} k_p: {} -> {}", self.id.as_str(), self.k_p, k_p);
        self.k_p = k_p;
    }

    pub fn k_v(&self) -> f64 {
        self.feedforward.k_v
    }

    pub fn set_k_v(&mut self, k_v: f64) {
        debug!("{} k_v: {} -> {}", self.id.as_str(), self.feedforward.k_v, k_v);
        self.feedforward.k_v = k_v;
    }

    pub fn brake_enabled(&self) -> bool {
        self.brake_enabled
    }

    pub fn set_brake_enabled(&mut self, enabled: bool) {
        if enabled != self.brake_enabled {
            debug!("{} brake enabled: {}", self.id.as_str(), enabled);
            self.brake_enabled = enabled;
        }
    }

    /// Function called when entering safe mode.
    pub fn make_safe(&mut self) {
        self.set_target_output(0.0);
    }

    fn set_mode(&mut self, mode: SetpointMode) {
        if std::mem::discriminant(&mode) != std::mem::discriminant(&self.mode) {
            debug!("{} mode {:?} -> {:?}", self.id.as_str(), self.mode, mode);
        }
        if mode.target_velocity().is_none() {
            self.report.rpm_limited = false;
        }
        self.mode = mode;
    }
}
