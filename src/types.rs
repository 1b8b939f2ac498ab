use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{BouncerError, configuration_error, invariant_violation};

pub type AttributeName = String;
pub type CandidateIndex = u64;
pub type AttributeVector = BTreeMap<AttributeName, bool>;

/// Ordered, duplicate-free attribute names tracked for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct AttributeSet {
    names: Vec<AttributeName>,
}

impl AttributeSet {
    pub fn new<I, S>(names: I) -> Result<Self, BouncerError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(configuration_error("attribute set cannot be empty"));
        }

        let mut seen = BTreeSet::new();
        for name in &names {
            if name.trim().is_empty() {
                return Err(configuration_error("attribute names cannot be blank"));
            }
            if !seen.insert(name.as_str()) {
                return Err(configuration_error(format!(
                    "attribute '{}' is declared more than once",
                    name
                )));
            }
        }

        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[AttributeName] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|candidate| candidate == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|candidate| candidate == name)
    }

    /// True when both sets track the same attributes, ignoring order.
    pub fn same_members<S: AsRef<str>>(&self, other: &[S]) -> bool {
        let lhs: BTreeSet<&str> = self.iter().collect();
        let rhs: BTreeSet<&str> = other.iter().map(AsRef::as_ref).collect();
        lhs == rhs && other.len() == self.names.len()
    }
}

impl TryFrom<Vec<String>> for AttributeSet {
    type Error = BouncerError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AttributeSet> for Vec<String> {
    fn from(value: AttributeSet) -> Self {
        value.names
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(alias = "personIndex")]
    pub index: CandidateIndex,
    #[serde(default)]
    pub attributes: AttributeVector,
}

impl Candidate {
    pub fn new(index: CandidateIndex, attributes: AttributeVector) -> Self {
        Self { index, attributes }
    }

    pub fn has(&self, attribute: &str) -> bool {
        self.attributes.get(attribute).copied().unwrap_or(false)
    }

    pub fn present(&self) -> impl Iterator<Item = &str> {
        self.attributes
            .iter()
            .filter(|(_, present)| **present)
            .map(|(name, _)| name.as_str())
    }

    pub fn validate_against(&self, attribute_set: &AttributeSet) -> Result<(), BouncerError> {
        if let Some(unknown) = self
            .attributes
            .keys()
            .find(|name| !attribute_set.contains(name))
        {
            return Err(invariant_violation(format!(
                "candidate {} carries attribute '{}' outside the attribute set",
                self.index, unknown
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraint {
    pub attribute: AttributeName,
    pub min_count: u32,
}

impl Constraint {
    pub fn new(attribute: impl Into<String>, min_count: u32) -> Self {
        Self {
            attribute: attribute.into(),
            min_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ConstraintSet {
    constraints: Vec<Constraint>,
}

impl ConstraintSet {
    pub fn new(
        constraints: Vec<Constraint>,
        attribute_set: &AttributeSet,
    ) -> Result<Self, BouncerError> {
        let mut seen = BTreeSet::new();
        for constraint in &constraints {
            if !attribute_set.contains(&constraint.attribute) {
                return Err(configuration_error(format!(
                    "constraint on '{}' names an attribute outside the attribute set",
                    constraint.attribute
                )));
            }
            if !seen.insert(constraint.attribute.as_str()) {
                return Err(configuration_error(format!(
                    "attribute '{}' is constrained more than once",
                    constraint.attribute
                )));
            }
        }

        Ok(Self { constraints })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn min_count(&self, attribute: &str) -> Option<u32> {
        self.constraints
            .iter()
            .find(|constraint| constraint.attribute == attribute)
            .map(|constraint| constraint.min_count)
    }

    pub fn as_slice(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn to_vec(&self) -> Vec<Constraint> {
        self.constraints.clone()
    }
}
