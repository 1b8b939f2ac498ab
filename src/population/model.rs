use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{
    error::{BouncerError, configuration_error, invariant_violation},
    population::joint::JointTable,
    types::{AttributeName, AttributeSet, AttributeVector},
};

pub type CorrelationMatrix = BTreeMap<AttributeName, BTreeMap<AttributeName, f64>>;

fn default_probability_sum_tolerance() -> f64 {
    1e-4
}

fn default_marginal_tolerance() -> f64 {
    0.01
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelTolerance {
    #[serde(default = "default_probability_sum_tolerance")]
    pub probability_sum: f64,
    #[serde(default = "default_marginal_tolerance")]
    pub marginal: f64,
}

impl Default for ModelTolerance {
    fn default() -> Self {
        Self {
            probability_sum: default_probability_sum_tolerance(),
            marginal: default_marginal_tolerance(),
        }
    }
}

/// Population statistics as published by a run service at start.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeStatistics {
    pub relative_frequencies: BTreeMap<AttributeName, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlations: Option<CorrelationMatrix>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMode {
    Joint,
    Independent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopulationModel {
    attribute_set: AttributeSet,
    marginal_frequencies: BTreeMap<AttributeName, f64>,
    joint: Option<JointTable>,
    correlations: Option<CorrelationMatrix>,
}

impl PopulationModel {
    pub fn new(
        attribute_set: AttributeSet,
        marginal_frequencies: BTreeMap<AttributeName, f64>,
        joint: Option<JointTable>,
        correlations: Option<CorrelationMatrix>,
        tolerance: &ModelTolerance,
    ) -> Result<Self, BouncerError> {
        let declared: Vec<&str> = marginal_frequencies.keys().map(String::as_str).collect();
        if !attribute_set.same_members(&declared) {
            return Err(configuration_error(format!(
                "marginal frequencies cover {:?} but the attribute set is {:?}",
                declared,
                attribute_set.names()
            )));
        }
        for (attribute, frequency) in &marginal_frequencies {
            if !frequency.is_finite() || !(0.0..=1.0).contains(frequency) {
                return Err(invariant_violation(format!(
                    "marginal frequency of '{}' is {}, expected a probability",
                    attribute, frequency
                )));
            }
        }

        if let Some(table) = &joint {
            if !attribute_set.same_members(table.attribute_order()) {
                return Err(configuration_error(format!(
                    "joint table covers {:?} but the attribute set is {:?}",
                    table.attribute_order(),
                    attribute_set.names()
                )));
            }
            for (attribute, declared) in &marginal_frequencies {
                let derived = table.marginal(attribute).unwrap_or(0.0);
                if (derived - declared).abs() > tolerance.marginal {
                    return Err(invariant_violation(format!(
                        "joint table marginal of '{}' is {:.5}, declared {:.5} (tolerance {})",
                        attribute, derived, declared, tolerance.marginal
                    )));
                }
            }
        }

        if let Some(matrix) = &correlations {
            for (row, columns) in matrix {
                for (column, coefficient) in columns {
                    if !attribute_set.contains(row) || !attribute_set.contains(column) {
                        return Err(configuration_error(format!(
                            "correlation between '{}' and '{}' names an unknown attribute",
                            row, column
                        )));
                    }
                    if !coefficient.is_finite() || !(-1.0..=1.0).contains(coefficient) {
                        return Err(invariant_violation(format!(
                            "correlation between '{}' and '{}' is {}",
                            row, column, coefficient
                        )));
                    }
                }
            }
        }

        Ok(Self {
            attribute_set,
            marginal_frequencies,
            joint,
            correlations,
        })
    }

    /// Marginals-only model, as reconstructed from a start-run response.
    pub fn from_statistics(
        attribute_set: AttributeSet,
        statistics: &AttributeStatistics,
    ) -> Result<Self, BouncerError> {
        Self::new(
            attribute_set,
            statistics.relative_frequencies.clone(),
            None,
            statistics.correlations.clone(),
            &ModelTolerance::default(),
        )
    }

    pub fn attribute_set(&self) -> &AttributeSet {
        &self.attribute_set
    }

    pub fn marginal_frequencies(&self) -> &BTreeMap<AttributeName, f64> {
        &self.marginal_frequencies
    }

    pub fn frequency(&self, attribute: &str) -> Option<f64> {
        self.marginal_frequencies.get(attribute).copied()
    }

    pub fn joint(&self) -> Option<&JointTable> {
        self.joint.as_ref()
    }

    pub fn correlations(&self) -> Option<&CorrelationMatrix> {
        self.correlations.as_ref()
    }

    pub fn sampling_mode(&self) -> SamplingMode {
        if self.joint.is_some() {
            SamplingMode::Joint
        } else {
            SamplingMode::Independent
        }
    }

    pub fn derived_correlations(&self) -> Option<CorrelationMatrix> {
        let table = self.joint.as_ref()?;
        let mut matrix = CorrelationMatrix::new();
        for row in self.attribute_set.iter() {
            let columns = matrix.entry(row.to_string()).or_default();
            for column in self.attribute_set.iter() {
                let coefficient = if row == column {
                    1.0
                } else {
                    table.correlation(row, column).unwrap_or(0.0)
                };
                columns.insert(column.to_string(), coefficient);
            }
        }
        Some(matrix)
    }

    pub fn statistics(&self) -> AttributeStatistics {
        AttributeStatistics {
            relative_frequencies: self.marginal_frequencies.clone(),
            correlations: self
                .correlations
                .clone()
                .or_else(|| self.derived_correlations()),
        }
    }

    /// Draws one attribute vector. Exact joint sampling when a table is
    /// present, one independent Bernoulli draw per attribute otherwise; the
    /// latter reproduces marginals but not correlations.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> AttributeVector {
        match &self.joint {
            Some(table) => table.sample(rng),
            None => self
                .attribute_set
                .iter()
                .map(|attribute| {
                    let frequency = self.frequency(attribute).unwrap_or(0.0);
                    let u: f64 = rng.random();
                    (attribute.to_string(), u < frequency)
                })
                .collect(),
        }
    }

    pub fn fingerprint(&self) -> String {
        let canonical = serde_json::json!({
            "attributes": self.attribute_set.names(),
            "marginals": self.marginal_frequencies,
            "joint": self.joint.as_ref().map(JointTable::to_spec),
            "correlations": self.correlations,
        });

        let mut hasher = Sha256::new();
        hasher.update(canonical.to_string().as_bytes());
        let digest = hasher.finalize();
        let hex = format!("{:x}", digest);
        format!("pm:{}", &hex[..16])
    }
}
