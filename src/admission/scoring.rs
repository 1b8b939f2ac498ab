use serde::{Deserialize, Serialize};

use crate::admission::{
    types::{StrategyRule, StrategyVerdict},
    view::DecisionView,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiConstraintBonus {
    pub min_helped: usize,
    pub factor: f64,
}

fn default_base_threshold() -> f64 {
    2.0
}

fn default_min_threshold() -> f64 {
    0.1
}

fn default_frequency_floor() -> f64 {
    0.001
}

fn default_multi_constraint_bonuses() -> Vec<MultiConstraintBonus> {
    vec![
        MultiConstraintBonus {
            min_helped: 2,
            factor: 1.5,
        },
        MultiConstraintBonus {
            min_helped: 3,
            factor: 2.0,
        },
    ]
}

fn default_accept_full_cover() -> bool {
    true
}

/// Scarcity-weighted score against a desperation-driven threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    #[serde(default = "default_base_threshold")]
    pub base_threshold: f64,
    #[serde(default = "default_min_threshold")]
    pub min_threshold: f64,
    #[serde(default = "default_frequency_floor")]
    pub frequency_floor: f64,
    /// Applied cumulatively: every bonus whose `min_helped` is reached scales
    /// the score.
    #[serde(default = "default_multi_constraint_bonuses")]
    pub multi_constraint_bonuses: Vec<MultiConstraintBonus>,
    #[serde(default = "default_accept_full_cover")]
    pub accept_full_cover: bool,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            base_threshold: default_base_threshold(),
            min_threshold: default_min_threshold(),
            frequency_floor: default_frequency_floor(),
            multi_constraint_bonuses: default_multi_constraint_bonuses(),
            accept_full_cover: default_accept_full_cover(),
        }
    }
}

impl ScoringPolicy {
    pub fn score(&self, view: &DecisionView<'_>) -> f64 {
        let slots = view.remaining_slots().max(1) as f64;
        let mut helped = 0;
        let mut score = 0.0;
        for need in view.helped() {
            helped += 1;
            let urgency = f64::from(need.needed) / slots;
            let rarity = 1.0 / view.frequency_or(need.attribute, self.frequency_floor);
            score += urgency * rarity;
        }

        for bonus in &self.multi_constraint_bonuses {
            if helped >= bonus.min_helped {
                score *= bonus.factor;
            }
        }
        score
    }

    /// Falls from `base_threshold` towards `min_threshold` as the most
    /// desperate constraint approaches needing every open slot.
    pub fn threshold(&self, view: &DecisionView<'_>) -> f64 {
        let slack = 1.0 - view.max_desperation();
        (self.base_threshold * slack * slack).max(self.min_threshold)
    }

    pub fn evaluate(&self, view: &DecisionView<'_>) -> StrategyVerdict {
        if self.accept_full_cover && view.covers_all_unmet() {
            return StrategyVerdict::admit(StrategyRule::FullCover);
        }

        let score = self.score(view);
        let threshold = self.threshold(view);
        let rule = StrategyRule::Score {
            score,
            threshold,
            helped: view.helped_count(),
        };
        if score >= threshold {
            StrategyVerdict::admit(rule)
        } else {
            StrategyVerdict::reject(rule)
        }
    }
}
