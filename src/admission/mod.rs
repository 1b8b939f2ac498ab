pub mod controller;
pub mod scoring;
pub mod state;
pub mod strategy;
pub mod types;
pub mod view;

pub use controller::AdmissionController;
pub use scoring::{MultiConstraintBonus, ScoringPolicy};
pub use state::AdmissionState;
pub use strategy::{
    AdmissionStrategy, FixedPriorityStrategy, PhaseWindowStrategy, ScarcityScoreStrategy,
    StrategyConfig, WindowUnit,
};
pub use types::{AdmissionDecision, AdmissionWhy, StrategyRule, StrategyVerdict};
pub use view::{ConstraintNeed, DecisionView};
