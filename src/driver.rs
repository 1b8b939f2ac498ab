use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use serde::{Deserialize, Serialize};

use crate::{
    admission::{AdmissionController, AdmissionState},
    error::{BouncerError, invariant_violation},
    population::PopulationModel,
    protocol::{
        DecideAndAdvanceRequest, DecideAndAdvanceResponse, StartRunRequest, StartRunResponse,
        TerminalResponse,
    },
    scenario::check_builtin_label,
    types::{AttributeName, AttributeSet, CandidateIndex, ConstraintSet},
};

/// Run-side half of the start / decide-and-advance contract. The local
/// harness implements it; so would a network client.
pub trait RunService: Send {
    fn start_run(&mut self, request: &StartRunRequest) -> Result<StartRunResponse, BouncerError>;

    fn decide_and_advance(
        &mut self,
        request: &DecideAndAdvanceRequest,
    ) -> Result<DecideAndAdvanceResponse, BouncerError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunEnd {
    Completed,
    Failed,
    Abandoned,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintReport {
    pub attribute: AttributeName,
    pub required: u32,
    pub achieved: u32,
    pub satisfied: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub run_id: String,
    pub scenario: String,
    pub strategy: String,
    pub end: RunEnd,
    pub admitted: u32,
    pub rejected: u32,
    pub attribute_counts: BTreeMap<AttributeName, u32>,
    pub constraints: Vec<ConstraintReport>,
    pub reason: String,
}

impl RunOutcome {
    pub fn all_constraints_satisfied(&self) -> bool {
        self.constraints.iter().all(|report| report.satisfied)
    }
}

/// Drives one run: asks the service for candidates, lets the controller
/// decide each one and mirrors the decision into a local state.
#[derive(Debug)]
pub struct RunDriver {
    controller: AdmissionController,
    capacity: u32,
    cancel: Arc<AtomicBool>,
}

impl RunDriver {
    pub fn new(controller: AdmissionController, capacity: u32) -> Self {
        Self {
            controller,
            capacity,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Setting the returned flag ends the run at the next candidate boundary.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn run(
        &self,
        service: &mut dyn RunService,
        scenario: &str,
    ) -> Result<RunOutcome, BouncerError> {
        let started = service.start_run(&StartRunRequest {
            scenario: scenario.to_string(),
        })?;
        let attribute_set = AttributeSet::new(
            started
                .attribute_statistics
                .relative_frequencies
                .keys()
                .cloned(),
        )?;
        check_builtin_label(scenario, &attribute_set)?;
        let constraints = ConstraintSet::new(started.constraints.clone(), &attribute_set)?;
        let model = PopulationModel::from_statistics(
            attribute_set.clone(),
            &started.attribute_statistics,
        )?;
        let mut state = AdmissionState::new(self.capacity, &attribute_set)?;

        tracing::info!(
            target: "driver",
            run_id = %started.run_id,
            scenario = scenario,
            strategy = self.controller.strategy_name(),
            constraints = constraints.len(),
            capacity = self.capacity,
            "run_started"
        );

        let report = RunReport {
            run_id: &started.run_id,
            scenario,
            strategy: self.controller.strategy_name(),
            constraints: &constraints,
        };

        let mut request = DecideAndAdvanceRequest::first(started.run_id.clone());
        let mut expected_index: Option<CandidateIndex> = None;
        loop {
            if self.cancel.load(Ordering::SeqCst) {
                tracing::warn!(
                    target: "driver",
                    run_id = %started.run_id,
                    admitted = state.admitted_count(),
                    rejected = state.rejected_count(),
                    "run_abandoned"
                );
                return Ok(report.abandoned(&state));
            }

            match service.decide_and_advance(&request)? {
                DecideAndAdvanceResponse::Running(running) => {
                    let candidate = running.next_candidate;
                    if let Some(expected) = expected_index
                        && candidate.index != expected
                    {
                        return Err(invariant_violation(format!(
                            "received candidate {} out of order, expected {}",
                            candidate.index, expected
                        )));
                    }
                    candidate.validate_against(&attribute_set)?;
                    if state.is_full() {
                        return Err(invariant_violation(format!(
                            "service offered candidate {} after {} admissions; driver capacity {} disagrees with the service",
                            candidate.index,
                            state.admitted_count(),
                            self.capacity
                        )));
                    }

                    let decision = self
                        .controller
                        .evaluate(&candidate, &state, &constraints, &model);
                    state.apply(&candidate, decision.admit)?;
                    tracing::debug!(
                        target: "driver",
                        run_id = %started.run_id,
                        candidate_index = candidate.index,
                        admit = decision.admit,
                        why = ?decision.why,
                        admitted = state.admitted_count(),
                        rejected = state.rejected_count(),
                        "candidate_decided"
                    );

                    expected_index = Some(candidate.index + 1);
                    request = DecideAndAdvanceRequest::decide(
                        started.run_id.clone(),
                        candidate.index,
                        decision.admit,
                    );
                }
                DecideAndAdvanceResponse::Completed(terminal) => {
                    return Ok(report.finished(RunEnd::Completed, terminal, &state));
                }
                DecideAndAdvanceResponse::Failed(terminal) => {
                    return Ok(report.finished(RunEnd::Failed, terminal, &state));
                }
            }
        }
    }
}

struct RunReport<'a> {
    run_id: &'a str,
    scenario: &'a str,
    strategy: &'static str,
    constraints: &'a ConstraintSet,
}

impl RunReport<'_> {
    fn finished(
        &self,
        end: RunEnd,
        terminal: TerminalResponse,
        mirrored: &AdmissionState,
    ) -> RunOutcome {
        let diverged = terminal.admitted_count != mirrored.admitted_count()
            || terminal.rejected_count != mirrored.rejected_count()
            || mirrored
                .attribute_counts()
                .iter()
                .any(|(attribute, count)| terminal.attribute_counts.get(attribute) != Some(count));
        if diverged {
            tracing::warn!(
                target: "driver",
                run_id = %self.run_id,
                service_admitted = terminal.admitted_count,
                service_rejected = terminal.rejected_count,
                local_admitted = mirrored.admitted_count(),
                local_rejected = mirrored.rejected_count(),
                "terminal_counts_diverged"
            );
        }

        let outcome = self.outcome(
            end,
            terminal.admitted_count,
            terminal.rejected_count,
            terminal.attribute_counts,
            terminal.reason,
        );
        tracing::info!(
            target: "driver",
            run_id = %self.run_id,
            end = ?outcome.end,
            admitted = outcome.admitted,
            rejected = outcome.rejected,
            satisfied = outcome.all_constraints_satisfied(),
            "run_finished"
        );
        outcome
    }

    fn abandoned(&self, mirrored: &AdmissionState) -> RunOutcome {
        self.outcome(
            RunEnd::Abandoned,
            mirrored.admitted_count(),
            mirrored.rejected_count(),
            mirrored.attribute_counts().clone(),
            "cancelled at a candidate boundary".to_string(),
        )
    }

    fn outcome(
        &self,
        end: RunEnd,
        admitted: u32,
        rejected: u32,
        attribute_counts: BTreeMap<AttributeName, u32>,
        reason: String,
    ) -> RunOutcome {
        let constraints = self
            .constraints
            .iter()
            .map(|constraint| {
                let achieved = attribute_counts
                    .get(&constraint.attribute)
                    .copied()
                    .unwrap_or(0);
                ConstraintReport {
                    attribute: constraint.attribute.clone(),
                    required: constraint.min_count,
                    achieved,
                    satisfied: achieved >= constraint.min_count,
                }
            })
            .collect();

        RunOutcome {
            run_id: self.run_id.to_string(),
            scenario: self.scenario.to_string(),
            strategy: self.strategy.to_string(),
            end,
            admitted,
            rejected,
            attribute_counts,
            constraints,
            reason,
        }
    }
}
