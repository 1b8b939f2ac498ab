use serde::{Deserialize, Serialize};

use crate::{
    admission::{
        scoring::ScoringPolicy,
        types::{StrategyRule, StrategyVerdict},
        view::DecisionView,
    },
    types::AttributeName,
};

/// Refinement consulted once a candidate is feasible and the constraints are
/// not yet all met.
pub trait AdmissionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn evaluate(&self, view: &DecisionView<'_>) -> StrategyVerdict;
}

#[derive(Debug, Clone, Default)]
pub struct ScarcityScoreStrategy {
    scoring: ScoringPolicy,
}

impl ScarcityScoreStrategy {
    pub fn new(scoring: ScoringPolicy) -> Self {
        Self { scoring }
    }
}

impl AdmissionStrategy for ScarcityScoreStrategy {
    fn name(&self) -> &'static str {
        "scarcity_score"
    }

    fn evaluate(&self, view: &DecisionView<'_>) -> StrategyVerdict {
        self.scoring.evaluate(view)
    }
}

/// Always admits carriers of the listed attributes; optionally keeps
/// `capacity - minCount(reserved)` as the ceiling on non-carriers of a
/// reserved attribute.
#[derive(Debug, Clone)]
pub struct FixedPriorityStrategy {
    priority_attributes: Vec<AttributeName>,
    reserved_attribute: Option<AttributeName>,
    reserve_margin: u32,
    scoring: ScoringPolicy,
}

impl FixedPriorityStrategy {
    pub fn new(
        priority_attributes: Vec<AttributeName>,
        reserved_attribute: Option<AttributeName>,
        reserve_margin: u32,
        scoring: ScoringPolicy,
    ) -> Self {
        Self {
            priority_attributes,
            reserved_attribute,
            reserve_margin,
            scoring,
        }
    }

    fn reserved_slots_exhausted(&self, view: &DecisionView<'_>, reserved: &str) -> bool {
        if view.candidate().has(reserved) {
            return false;
        }
        let Some(min_count) = view.constraints().min_count(reserved) else {
            return false;
        };

        let state = view.state();
        let ceiling = state.capacity().saturating_sub(min_count);
        let without = state
            .admitted_count()
            .saturating_sub(state.count(reserved))
            .saturating_add(self.reserve_margin);
        without >= ceiling
    }
}

impl AdmissionStrategy for FixedPriorityStrategy {
    fn name(&self) -> &'static str {
        "fixed_priority_attribute"
    }

    fn evaluate(&self, view: &DecisionView<'_>) -> StrategyVerdict {
        if let Some(attribute) = self
            .priority_attributes
            .iter()
            .find(|attribute| view.candidate().has(attribute))
        {
            return StrategyVerdict::admit(StrategyRule::PriorityAttribute {
                attribute: attribute.clone(),
            });
        }

        if let Some(reserved) = &self.reserved_attribute
            && self.reserved_slots_exhausted(view, reserved)
        {
            return StrategyVerdict::reject(StrategyRule::ReservedSlotsExhausted {
                attribute: reserved.clone(),
            });
        }

        self.scoring.evaluate(view)
    }
}

/// What the phase window counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowUnit {
    #[default]
    Admissions,
    Decisions,
}

/// Admits anyone carrying a constrained attribute until `window` admissions
/// (or decisions) have happened. Afterwards carriers are admitted, and a
/// candidate carrying nothing constrained gets in only while the open slots
/// still cover the total need.
#[derive(Debug, Clone)]
pub struct PhaseWindowStrategy {
    window: u64,
    unit: WindowUnit,
}

impl PhaseWindowStrategy {
    pub fn new(window: u64, unit: WindowUnit) -> Self {
        Self { window, unit }
    }

    fn elapsed(&self, view: &DecisionView<'_>) -> u64 {
        match self.unit {
            WindowUnit::Admissions => u64::from(view.state().admitted_count()),
            WindowUnit::Decisions => view.state().decisions(),
        }
    }
}

impl AdmissionStrategy for PhaseWindowStrategy {
    fn name(&self) -> &'static str {
        "phase_window"
    }

    fn evaluate(&self, view: &DecisionView<'_>) -> StrategyVerdict {
        let carries = view.carries_constrained_attribute();
        if self.elapsed(view) < self.window {
            let rule = StrategyRule::PhaseWindow {
                carries_constrained_attribute: carries,
            };
            return if carries {
                StrategyVerdict::admit(rule)
            } else {
                StrategyVerdict::reject(rule)
            };
        }

        // Met attributes still count here; stage 1 already vetted feasibility.
        if carries {
            return StrategyVerdict::admit(StrategyRule::CarrierAfterWindow);
        }

        let remaining_slots = view.remaining_slots_if_admitted();
        let total_needed = view.total_needed();
        let rule = StrategyRule::SlackCoverage {
            remaining_slots,
            total_needed,
        };
        if remaining_slots >= 0 && remaining_slots as u64 >= total_needed {
            StrategyVerdict::admit(rule)
        } else {
            StrategyVerdict::reject(rule)
        }
    }
}

fn default_reserve_margin() -> u32 {
    0
}

fn default_window() -> u64 {
    1_200
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyConfig {
    ScarcityScore,
    FixedPriorityAttribute {
        priority_attributes: Vec<AttributeName>,
        #[serde(default)]
        reserved_attribute: Option<AttributeName>,
        #[serde(default = "default_reserve_margin")]
        reserve_margin: u32,
    },
    PhaseWindow {
        #[serde(default = "default_window")]
        window: u64,
        #[serde(default)]
        window_unit: WindowUnit,
    },
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self::ScarcityScore
    }
}

impl StrategyConfig {
    pub fn build(&self, scoring: ScoringPolicy) -> Box<dyn AdmissionStrategy> {
        match self {
            Self::ScarcityScore => Box::new(ScarcityScoreStrategy::new(scoring)),
            Self::FixedPriorityAttribute {
                priority_attributes,
                reserved_attribute,
                reserve_margin,
            } => Box::new(FixedPriorityStrategy::new(
                priority_attributes.clone(),
                reserved_attribute.clone(),
                *reserve_margin,
                scoring,
            )),
            Self::PhaseWindow {
                window,
                window_unit,
            } => Box::new(PhaseWindowStrategy::new(*window, *window_unit)),
        }
    }

    pub fn attributes(&self) -> Vec<&str> {
        match self {
            Self::FixedPriorityAttribute {
                priority_attributes,
                reserved_attribute,
                ..
            } => priority_attributes
                .iter()
                .chain(reserved_attribute.iter())
                .map(String::as_str)
                .collect(),
            Self::ScarcityScore | Self::PhaseWindow { .. } => Vec::new(),
        }
    }
}
