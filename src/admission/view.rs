use crate::{
    admission::state::AdmissionState,
    population::PopulationModel,
    types::{Candidate, ConstraintSet},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintNeed<'a> {
    pub attribute: &'a str,
    pub min_count: u32,
    pub current: u32,
    /// Outstanding count before this decision.
    pub needed: u32,
    pub carried: bool,
}

impl ConstraintNeed<'_> {
    /// Outstanding count if this candidate were admitted.
    pub fn needed_if_admitted(&self) -> u32 {
        if self.carried {
            self.needed.saturating_sub(1)
        } else {
            self.needed
        }
    }

    pub fn is_met(&self) -> bool {
        self.needed == 0
    }

    pub fn is_helped(&self) -> bool {
        self.carried && self.needed > 0
    }
}

/// Read-only projection of one pending decision: the candidate against the
/// current counts, constraints and population statistics.
#[derive(Debug, Clone)]
pub struct DecisionView<'a> {
    candidate: &'a Candidate,
    state: &'a AdmissionState,
    constraints: &'a ConstraintSet,
    model: &'a PopulationModel,
    needs: Vec<ConstraintNeed<'a>>,
}

impl<'a> DecisionView<'a> {
    pub fn new(
        candidate: &'a Candidate,
        state: &'a AdmissionState,
        constraints: &'a ConstraintSet,
        model: &'a PopulationModel,
    ) -> Self {
        let needs = constraints
            .iter()
            .map(|constraint| {
                let current = state.count(&constraint.attribute);
                ConstraintNeed {
                    attribute: constraint.attribute.as_str(),
                    min_count: constraint.min_count,
                    current,
                    needed: constraint.min_count.saturating_sub(current),
                    carried: candidate.has(&constraint.attribute),
                }
            })
            .collect();

        Self {
            candidate,
            state,
            constraints,
            model,
            needs,
        }
    }

    pub fn candidate(&self) -> &Candidate {
        self.candidate
    }

    pub fn state(&self) -> &AdmissionState {
        self.state
    }

    pub fn constraints(&self) -> &ConstraintSet {
        self.constraints
    }

    pub fn model(&self) -> &PopulationModel {
        self.model
    }

    pub fn needs(&self) -> &[ConstraintNeed<'a>] {
        &self.needs
    }

    pub fn need(&self, attribute: &str) -> Option<&ConstraintNeed<'a>> {
        self.needs.iter().find(|need| need.attribute == attribute)
    }

    /// Slots still open before this decision.
    pub fn remaining_slots(&self) -> i64 {
        i64::from(self.state.capacity()) - i64::from(self.state.admitted_count())
    }

    /// Slots that would stay open after admitting this candidate.
    pub fn remaining_slots_if_admitted(&self) -> i64 {
        self.remaining_slots() - 1
    }

    /// First constraint that admitting this candidate would make unreachable,
    /// assuming every later slot goes to that constraint's attribute.
    pub fn first_infeasible(&self) -> Option<&ConstraintNeed<'a>> {
        let remaining = self.remaining_slots_if_admitted();
        self.needs
            .iter()
            .find(|need| i64::from(need.needed_if_admitted()) > remaining)
    }

    pub fn all_constraints_met(&self) -> bool {
        self.needs.iter().all(ConstraintNeed::is_met)
    }

    pub fn helped(&self) -> impl Iterator<Item = &ConstraintNeed<'a>> {
        self.needs.iter().filter(|need| need.is_helped())
    }

    pub fn helped_count(&self) -> usize {
        self.helped().count()
    }

    /// Candidate carries every attribute whose constraint is still unmet.
    pub fn covers_all_unmet(&self) -> bool {
        let mut unmet = self.needs.iter().filter(|need| !need.is_met()).peekable();
        unmet.peek().is_some() && unmet.all(|need| need.carried)
    }

    pub fn carries_constrained_attribute(&self) -> bool {
        self.needs.iter().any(|need| need.carried)
    }

    pub fn total_needed(&self) -> u64 {
        self.needs.iter().map(|need| u64::from(need.needed)).sum()
    }

    /// Largest share of the open slots some single constraint still needs,
    /// clamped to `[0, 1]`.
    pub fn max_desperation(&self) -> f64 {
        let slots = self.remaining_slots().max(1) as f64;
        self.needs
            .iter()
            .map(|need| f64::from(need.needed) / slots)
            .fold(0.0_f64, f64::max)
            .clamp(0.0, 1.0)
    }

    /// Population frequency of an attribute, floored so that absent or
    /// never-seen attributes still yield a finite rarity.
    pub fn frequency_or(&self, attribute: &str, floor: f64) -> f64 {
        self.model
            .frequency(attribute)
            .unwrap_or(floor)
            .max(floor)
    }
}
