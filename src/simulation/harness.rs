use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    admission::AdmissionState,
    arrival::CandidateSource,
    driver::RunService,
    error::{BouncerError, configuration_error, invalid_request},
    population::PopulationModel,
    protocol::{
        DecideAndAdvanceRequest, DecideAndAdvanceResponse, RunningResponse, StartRunRequest,
        StartRunResponse, TerminalResponse,
    },
    types::{Candidate, CandidateIndex, ConstraintSet},
};

fn default_capacity() -> u32 {
    1_000
}

fn default_max_rejections() -> u32 {
    20_000
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    #[serde(default = "default_capacity")]
    pub capacity: u32,
    #[serde(default = "default_max_rejections")]
    pub max_rejections: u32,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            max_rejections: default_max_rejections(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    NotStarted,
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// In-process stand-in for the live run service.
///
/// Speaks the same request/response contract, drawing arrivals from a
/// [`CandidateSource`] and keeping its own authoritative [`AdmissionState`].
pub struct LocalSimulationHarness {
    run_id: String,
    label: String,
    constraints: ConstraintSet,
    model: Arc<PopulationModel>,
    source: Box<dyn CandidateSource>,
    config: HarnessConfig,
    state: AdmissionState,
    status: RunStatus,
    pending: Option<Candidate>,
    next_index: CandidateIndex,
}

impl LocalSimulationHarness {
    pub fn new(
        label: impl Into<String>,
        constraints: ConstraintSet,
        model: Arc<PopulationModel>,
        source: Box<dyn CandidateSource>,
        config: HarnessConfig,
    ) -> Result<Self, BouncerError> {
        if let Some(unknown) = constraints
            .iter()
            .find(|constraint| !model.attribute_set().contains(&constraint.attribute))
        {
            return Err(configuration_error(format!(
                "constraint on '{}' is not covered by the population model",
                unknown.attribute
            )));
        }
        if config.max_rejections == 0 {
            return Err(configuration_error("max_rejections must be positive"));
        }
        let state = AdmissionState::new(config.capacity, model.attribute_set())?;

        Ok(Self {
            run_id: Uuid::now_v7().to_string(),
            label: label.into(),
            constraints,
            model,
            source,
            config,
            state,
            status: RunStatus::NotStarted,
            pending: None,
            next_index: 0,
        })
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn capacity(&self) -> u32 {
        self.config.capacity
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn state(&self) -> &AdmissionState {
        &self.state
    }

    pub fn pending_candidate(&self) -> Option<&Candidate> {
        self.pending.as_ref()
    }

    pub fn start_run(&mut self, request: &StartRunRequest) -> Result<StartRunResponse, BouncerError> {
        if self.status != RunStatus::NotStarted {
            return Err(invalid_request(format!(
                "run {} was already started",
                self.run_id
            )));
        }
        if request.scenario != self.label {
            return Err(configuration_error(format!(
                "harness plays scenario '{}', start requested '{}'",
                self.label, request.scenario
            )));
        }

        self.state.reset();
        self.pending = None;
        self.next_index = 0;
        self.status = RunStatus::Running;

        tracing::info!(
            target: "simulation",
            run_id = %self.run_id,
            scenario = %self.label,
            model = %self.model.fingerprint(),
            sampling = ?self.model.sampling_mode(),
            capacity = self.config.capacity,
            max_rejections = self.config.max_rejections,
            "run_started"
        );

        Ok(StartRunResponse {
            run_id: self.run_id.clone(),
            constraints: self.constraints.to_vec(),
            attribute_statistics: self.model.statistics(),
        })
    }

    pub fn decide_and_advance(
        &mut self,
        request: &DecideAndAdvanceRequest,
    ) -> Result<DecideAndAdvanceResponse, BouncerError> {
        if request.run_id != self.run_id {
            return Err(invalid_request(format!(
                "unknown run '{}', this harness serves '{}'",
                request.run_id, self.run_id
            )));
        }

        match self.status {
            RunStatus::NotStarted => {
                return Err(invalid_request(format!(
                    "run {} has not been started",
                    self.run_id
                )));
            }
            RunStatus::Completed => {
                return Ok(DecideAndAdvanceResponse::Completed(self.terminal_response()));
            }
            RunStatus::Failed => {
                return Ok(DecideAndAdvanceResponse::Failed(self.terminal_response()));
            }
            RunStatus::Running => {}
        }

        match (self.pending.as_ref(), request.decision) {
            (Some(pending), Some(accept)) => {
                if request.prior_candidate_index != Some(pending.index) {
                    return Err(invalid_request(format!(
                        "decision refers to candidate {:?}, pending candidate is {}",
                        request.prior_candidate_index, pending.index
                    )));
                }
                self.state.apply(pending, accept)?;
                tracing::trace!(
                    target: "simulation",
                    run_id = %self.run_id,
                    candidate_index = pending.index,
                    accept = accept,
                    "decision_applied"
                );
                self.pending = None;
            }
            (Some(pending), None) => {
                return Err(invalid_request(format!(
                    "candidate {} is awaiting a decision",
                    pending.index
                )));
            }
            (None, Some(_)) => {
                return Err(invalid_request("no candidate is awaiting a decision"));
            }
            (None, None) => {
                if request.prior_candidate_index.is_some() {
                    return Err(invalid_request(
                        "first call must not name a prior candidate",
                    ));
                }
            }
        }

        if self.state.admitted_count() >= self.config.capacity {
            self.status = RunStatus::Completed;
            let response = self.terminal_response();
            tracing::info!(
                target: "simulation",
                run_id = %self.run_id,
                admitted = response.admitted_count,
                rejected = response.rejected_count,
                "run_completed"
            );
            return Ok(DecideAndAdvanceResponse::Completed(response));
        }
        if self.state.rejected_count() >= self.config.max_rejections {
            self.status = RunStatus::Failed;
            let response = self.terminal_response();
            tracing::warn!(
                target: "simulation",
                run_id = %self.run_id,
                admitted = response.admitted_count,
                rejected = response.rejected_count,
                "run_failed"
            );
            return Ok(DecideAndAdvanceResponse::Failed(response));
        }

        let candidate = Candidate::new(self.next_index, self.source.next_attributes());
        self.next_index += 1;
        self.pending = Some(candidate.clone());

        Ok(DecideAndAdvanceResponse::Running(RunningResponse {
            next_candidate: candidate,
            rejected_count_so_far: self.state.rejected_count(),
        }))
    }

    fn terminal_response(&self) -> TerminalResponse {
        let reason = match self.status {
            RunStatus::Completed => format!("venue filled to capacity {}", self.config.capacity),
            RunStatus::Failed => format!(
                "rejection budget of {} exhausted",
                self.config.max_rejections
            ),
            RunStatus::NotStarted | RunStatus::Running => String::new(),
        };
        TerminalResponse {
            rejected_count: self.state.rejected_count(),
            admitted_count: self.state.admitted_count(),
            attribute_counts: self.state.attribute_counts().clone(),
            reason,
        }
    }
}

impl RunService for LocalSimulationHarness {
    fn start_run(&mut self, request: &StartRunRequest) -> Result<StartRunResponse, BouncerError> {
        LocalSimulationHarness::start_run(self, request)
    }

    fn decide_and_advance(
        &mut self,
        request: &DecideAndAdvanceRequest,
    ) -> Result<DecideAndAdvanceResponse, BouncerError> {
        LocalSimulationHarness::decide_and_advance(self, request)
    }
}

impl std::fmt::Debug for LocalSimulationHarness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSimulationHarness")
            .field("run_id", &self.run_id)
            .field("label", &self.label)
            .field("status", &self.status)
            .field("state", &self.state)
            .field("next_index", &self.next_index)
            .finish_non_exhaustive()
    }
}
