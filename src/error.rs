use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BouncerErrorKind {
    Configuration,
    InvariantViolation,
    InvalidRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct BouncerError {
    pub kind: BouncerErrorKind,
    pub message: String,
}

impl BouncerError {
    pub fn new(kind: BouncerErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_configuration(&self) -> bool {
        self.kind == BouncerErrorKind::Configuration
    }

    pub fn is_invariant_violation(&self) -> bool {
        self.kind == BouncerErrorKind::InvariantViolation
    }

    pub fn is_invalid_request(&self) -> bool {
        self.kind == BouncerErrorKind::InvalidRequest
    }
}

pub fn configuration_error(message: impl Into<String>) -> BouncerError {
    BouncerError::new(BouncerErrorKind::Configuration, message)
}

pub fn invariant_violation(message: impl Into<String>) -> BouncerError {
    BouncerError::new(BouncerErrorKind::InvariantViolation, message)
}

pub fn invalid_request(message: impl Into<String>) -> BouncerError {
    BouncerError::new(BouncerErrorKind::InvalidRequest, message)
}
