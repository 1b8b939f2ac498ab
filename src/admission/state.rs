use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    error::{BouncerError, configuration_error, invariant_violation},
    types::{AttributeName, AttributeSet, Candidate, ConstraintSet},
};

/// Admission counters for one run. Owned and mutated only by the driving
/// loop; the controller reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionState {
    admitted_count: u32,
    rejected_count: u32,
    attribute_counts: BTreeMap<AttributeName, u32>,
    capacity: u32,
}

impl AdmissionState {
    pub fn new(capacity: u32, attribute_set: &AttributeSet) -> Result<Self, BouncerError> {
        if capacity == 0 {
            return Err(configuration_error("capacity must be positive"));
        }
        Ok(Self {
            admitted_count: 0,
            rejected_count: 0,
            attribute_counts: attribute_set.iter().map(|name| (name.to_string(), 0)).collect(),
            capacity,
        })
    }

    pub fn from_counts(
        capacity: u32,
        admitted_count: u32,
        rejected_count: u32,
        attribute_counts: BTreeMap<AttributeName, u32>,
    ) -> Result<Self, BouncerError> {
        if capacity == 0 {
            return Err(configuration_error("capacity must be positive"));
        }
        if admitted_count > capacity {
            return Err(invariant_violation(format!(
                "admitted count {} exceeds capacity {}",
                admitted_count, capacity
            )));
        }
        if let Some((attribute, count)) = attribute_counts
            .iter()
            .find(|(_, count)| **count > admitted_count)
        {
            return Err(invariant_violation(format!(
                "attribute '{}' count {} exceeds admitted count {}",
                attribute, count, admitted_count
            )));
        }
        Ok(Self {
            admitted_count,
            rejected_count,
            attribute_counts,
            capacity,
        })
    }

    pub fn admitted_count(&self) -> u32 {
        self.admitted_count
    }

    pub fn rejected_count(&self) -> u32 {
        self.rejected_count
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn attribute_counts(&self) -> &BTreeMap<AttributeName, u32> {
        &self.attribute_counts
    }

    pub fn count(&self, attribute: &str) -> u32 {
        self.attribute_counts.get(attribute).copied().unwrap_or(0)
    }

    pub fn decisions(&self) -> u64 {
        u64::from(self.admitted_count) + u64::from(self.rejected_count)
    }

    pub fn is_full(&self) -> bool {
        self.admitted_count >= self.capacity
    }

    pub fn all_constraints_met(&self, constraints: &ConstraintSet) -> bool {
        constraints
            .iter()
            .all(|constraint| self.count(&constraint.attribute) >= constraint.min_count)
    }

    /// Applies one final decision. Attributes the state does not track are
    /// ignored.
    pub fn apply(&mut self, candidate: &Candidate, accept: bool) -> Result<(), BouncerError> {
        if !accept {
            self.rejected_count = self.rejected_count.saturating_add(1);
            return Ok(());
        }

        if self.is_full() {
            return Err(invariant_violation(format!(
                "cannot admit candidate {}: venue already holds {} of {}",
                candidate.index, self.admitted_count, self.capacity
            )));
        }

        self.admitted_count += 1;
        for attribute in candidate.present() {
            if let Some(count) = self.attribute_counts.get_mut(attribute) {
                *count += 1;
            }
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.admitted_count = 0;
        self.rejected_count = 0;
        for count in self.attribute_counts.values_mut() {
            *count = 0;
        }
    }
}
