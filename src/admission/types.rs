use serde::{Deserialize, Serialize};

use crate::types::AttributeName;

/// Which refinement of the scoring stage produced a verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyRule {
    FullCover,
    PriorityAttribute { attribute: AttributeName },
    ReservedSlotsExhausted { attribute: AttributeName },
    PhaseWindow { carries_constrained_attribute: bool },
    CarrierAfterWindow,
    SlackCoverage { remaining_slots: i64, total_needed: u64 },
    Score { score: f64, threshold: f64, helped: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyVerdict {
    pub admit: bool,
    pub rule: StrategyRule,
}

impl StrategyVerdict {
    pub fn admit(rule: StrategyRule) -> Self {
        Self { admit: true, rule }
    }

    pub fn reject(rule: StrategyRule) -> Self {
        Self { admit: false, rule }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AdmissionWhy {
    VenueFull {
        capacity: u32,
    },
    Infeasible {
        attribute: AttributeName,
        needed: u32,
        remaining_slots: i64,
    },
    Saturated,
    Strategy {
        strategy: String,
        rule: StrategyRule,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmissionDecision {
    pub admit: bool,
    pub why: AdmissionWhy,
}

impl AdmissionDecision {
    pub fn admitted(&self) -> bool {
        self.admit
    }

    pub fn is_infeasible(&self) -> bool {
        matches!(
            self.why,
            AdmissionWhy::Infeasible { .. } | AdmissionWhy::VenueFull { .. }
        )
    }
}
