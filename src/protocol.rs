use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    population::AttributeStatistics,
    types::{AttributeName, Candidate, CandidateIndex, Constraint},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StartRunRequest {
    pub scenario: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRunResponse {
    pub run_id: String,
    pub constraints: Vec<Constraint>,
    pub attribute_statistics: AttributeStatistics,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DecideAndAdvanceRequest {
    pub run_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prior_candidate_index: Option<CandidateIndex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<bool>,
}

impl DecideAndAdvanceRequest {
    pub fn first(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            prior_candidate_index: None,
            decision: None,
        }
    }

    pub fn decide(run_id: impl Into<String>, candidate_index: CandidateIndex, accept: bool) -> Self {
        Self {
            run_id: run_id.into(),
            prior_candidate_index: Some(candidate_index),
            decision: Some(accept),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningResponse {
    pub next_candidate: Candidate,
    pub rejected_count_so_far: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalResponse {
    pub rejected_count: u32,
    pub admitted_count: u32,
    pub attribute_counts: BTreeMap<AttributeName, u32>,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DecideAndAdvanceResponse {
    Running(RunningResponse),
    Completed(TerminalResponse),
    Failed(TerminalResponse),
}

impl DecideAndAdvanceResponse {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running(_))
    }
}
