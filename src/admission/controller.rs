use crate::{
    admission::{
        scoring::ScoringPolicy,
        state::AdmissionState,
        strategy::{AdmissionStrategy, StrategyConfig},
        types::{AdmissionDecision, AdmissionWhy},
        view::DecisionView,
    },
    population::PopulationModel,
    types::{Candidate, ConstraintSet},
};

/// Accept/reject policy for a single candidate.
///
/// Evaluation order is fixed: a full venue or an infeasible accept rejects,
/// a run with every constraint met accepts, and only then is the configured
/// strategy consulted. The controller never mutates state.
pub struct AdmissionController {
    strategy: Box<dyn AdmissionStrategy>,
}

impl AdmissionController {
    pub fn new(strategy: Box<dyn AdmissionStrategy>) -> Self {
        Self { strategy }
    }

    pub fn from_config(strategy: &StrategyConfig, scoring: ScoringPolicy) -> Self {
        Self::new(strategy.build(scoring))
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn decide(
        &self,
        candidate: &Candidate,
        state: &AdmissionState,
        constraints: &ConstraintSet,
        model: &PopulationModel,
    ) -> bool {
        self.evaluate(candidate, state, constraints, model).admitted()
    }

    pub fn evaluate(
        &self,
        candidate: &Candidate,
        state: &AdmissionState,
        constraints: &ConstraintSet,
        model: &PopulationModel,
    ) -> AdmissionDecision {
        let view = DecisionView::new(candidate, state, constraints, model);

        if view.remaining_slots_if_admitted() < 0 {
            return AdmissionDecision {
                admit: false,
                why: AdmissionWhy::VenueFull {
                    capacity: state.capacity(),
                },
            };
        }

        if let Some(need) = view.first_infeasible() {
            return AdmissionDecision {
                admit: false,
                why: AdmissionWhy::Infeasible {
                    attribute: need.attribute.to_string(),
                    needed: need.needed_if_admitted(),
                    remaining_slots: view.remaining_slots_if_admitted(),
                },
            };
        }

        if view.all_constraints_met() {
            return AdmissionDecision {
                admit: true,
                why: AdmissionWhy::Saturated,
            };
        }

        let verdict = self.strategy.evaluate(&view);
        AdmissionDecision {
            admit: verdict.admit,
            why: AdmissionWhy::Strategy {
                strategy: self.strategy.name().to_string(),
                rule: verdict.rule,
            },
        }
    }
}

impl Default for AdmissionController {
    fn default() -> Self {
        Self::from_config(&StrategyConfig::default(), ScoringPolicy::default())
    }
}

impl std::fmt::Debug for AdmissionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionController")
            .field("strategy", &self.strategy.name())
            .finish()
    }
}
