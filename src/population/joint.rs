use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    error::{BouncerError, configuration_error, invariant_violation},
    population::model::ModelTolerance,
    types::{AttributeName, AttributeVector},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointEntry {
    pub outcome: Vec<bool>,
    pub probability: f64,
}

impl JointEntry {
    pub fn new(outcome: impl Into<Vec<bool>>, probability: f64) -> Self {
        Self {
            outcome: outcome.into(),
            probability,
        }
    }
}

/// Serialized form of a joint table, as written in scenario configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointTableSpec {
    pub attribute_order: Vec<AttributeName>,
    pub entries: Vec<JointEntry>,
}

/// Exact discrete distribution over every attribute-value combination.
///
/// Entries keep their declared order; the cumulative mass is computed once so
/// every draw walks the table in the same order.
#[derive(Debug, Clone, PartialEq)]
pub struct JointTable {
    attribute_order: Vec<AttributeName>,
    entries: Vec<JointEntry>,
    cumulative: Vec<f64>,
}

impl JointTable {
    pub fn new(
        attribute_order: Vec<AttributeName>,
        entries: Vec<JointEntry>,
        tolerance: &ModelTolerance,
    ) -> Result<Self, BouncerError> {
        if attribute_order.is_empty() {
            return Err(configuration_error("joint table attribute order is empty"));
        }
        let mut names = BTreeSet::new();
        for name in &attribute_order {
            if !names.insert(name.as_str()) {
                return Err(configuration_error(format!(
                    "joint table lists attribute '{}' twice",
                    name
                )));
            }
        }
        if entries.is_empty() {
            return Err(invariant_violation("joint table has no entries"));
        }

        let mut outcomes = BTreeSet::new();
        let mut cumulative = Vec::with_capacity(entries.len());
        let mut running = 0.0_f64;
        for entry in &entries {
            if entry.outcome.len() != attribute_order.len() {
                return Err(invariant_violation(format!(
                    "joint table outcome {:?} has {} values, expected {}",
                    entry.outcome,
                    entry.outcome.len(),
                    attribute_order.len()
                )));
            }
            if !entry.probability.is_finite() || entry.probability < 0.0 {
                return Err(invariant_violation(format!(
                    "joint table outcome {:?} has invalid probability {}",
                    entry.outcome, entry.probability
                )));
            }
            if !outcomes.insert(entry.outcome.clone()) {
                return Err(invariant_violation(format!(
                    "joint table outcome {:?} is listed twice",
                    entry.outcome
                )));
            }
            running += entry.probability;
            cumulative.push(running);
        }

        if (running - 1.0).abs() > tolerance.probability_sum {
            return Err(invariant_violation(format!(
                "joint table probabilities sum to {running}, expected 1 within {}",
                tolerance.probability_sum
            )));
        }

        Ok(Self {
            attribute_order,
            entries,
            cumulative,
        })
    }

    pub fn from_spec(spec: JointTableSpec, tolerance: &ModelTolerance) -> Result<Self, BouncerError> {
        Self::new(spec.attribute_order, spec.entries, tolerance)
    }

    pub fn to_spec(&self) -> JointTableSpec {
        JointTableSpec {
            attribute_order: self.attribute_order.clone(),
            entries: self.entries.clone(),
        }
    }

    pub fn attribute_order(&self) -> &[AttributeName] {
        &self.attribute_order
    }

    pub fn entries(&self) -> &[JointEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_mass(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// P(attribute = true), summed over every other attribute.
    pub fn marginal(&self, attribute: &str) -> Option<f64> {
        let column = self.column(attribute)?;
        Some(
            self.entries
                .iter()
                .filter(|entry| entry.outcome[column])
                .map(|entry| entry.probability)
                .sum(),
        )
    }

    /// P(lhs = true and rhs = true).
    pub fn pair_probability(&self, lhs: &str, rhs: &str) -> Option<f64> {
        let lhs_column = self.column(lhs)?;
        let rhs_column = self.column(rhs)?;
        Some(
            self.entries
                .iter()
                .filter(|entry| entry.outcome[lhs_column] && entry.outcome[rhs_column])
                .map(|entry| entry.probability)
                .sum(),
        )
    }

    /// Phi coefficient between two boolean attributes. `None` when either
    /// attribute is unknown or degenerate (always or never present).
    pub fn correlation(&self, lhs: &str, rhs: &str) -> Option<f64> {
        let p_lhs = self.marginal(lhs)?;
        let p_rhs = self.marginal(rhs)?;
        let p_both = self.pair_probability(lhs, rhs)?;

        let spread = (p_lhs * (1.0 - p_lhs) * p_rhs * (1.0 - p_rhs)).sqrt();
        if spread <= f64::EPSILON {
            return None;
        }
        Some(((p_both - p_lhs * p_rhs) / spread).clamp(-1.0, 1.0))
    }

    /// Index of the first entry whose cumulative mass reaches `u`. Falls back
    /// to the last entry when rounding leaves the total slightly below `u`.
    pub fn locate(&self, u: f64) -> usize {
        let index = self.cumulative.partition_point(|mass| *mass < u);
        index.min(self.entries.len() - 1)
    }

    pub fn outcome(&self, index: usize) -> AttributeVector {
        self.attribute_order
            .iter()
            .cloned()
            .zip(self.entries[index].outcome.iter().copied())
            .collect()
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> AttributeVector {
        let u: f64 = rng.random();
        self.outcome(self.locate(u))
    }

    fn column(&self, attribute: &str) -> Option<usize> {
        self.attribute_order
            .iter()
            .position(|name| name == attribute)
    }
}
