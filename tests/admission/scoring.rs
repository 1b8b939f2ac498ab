use bouncer::admission::{DecisionView, ScoringPolicy, StrategyRule};

use crate::{candidate, constraints, marginals_model, state};

#[test]
fn given_single_helped_constraint_when_scoring_then_urgency_times_rarity() {
    let model = marginals_model(&[("young", 0.3149), ("well_dressed", 0.3223)]);
    let constraints = constraints(&model, &[("young", 600), ("well_dressed", 600)]);
    let state = state(1000, 0, 0, &[]);
    let candidate = candidate(0, &["young"]);
    let view = DecisionView::new(&candidate, &state, &constraints, &model);
    let policy = ScoringPolicy::default();

    let expected_score = (600.0 / 1000.0) * (1.0 / 0.3149);
    assert!((policy.score(&view) - expected_score).abs() < 1e-9);
    assert!((policy.threshold(&view) - 2.0 * 0.4 * 0.4).abs() < 1e-9);

    let verdict = policy.evaluate(&view);
    assert!(verdict.admit);
    assert!(matches!(verdict.rule, StrategyRule::Score { helped: 1, .. }));
}

#[test]
fn given_unhelpful_candidate_when_scoring_then_rejected_below_threshold() {
    let model = marginals_model(&[("young", 0.3149), ("well_dressed", 0.3223)]);
    let constraints = constraints(&model, &[("young", 600), ("well_dressed", 600)]);
    let state = state(1000, 0, 0, &[]);
    let candidate = candidate(0, &[]);
    let view = DecisionView::new(&candidate, &state, &constraints, &model);

    let verdict = ScoringPolicy::default().evaluate(&view);
    assert!(!verdict.admit);
}

#[test]
fn given_three_helped_constraints_when_scoring_then_bonuses_compound() {
    let model = marginals_model(&[("a", 0.5), ("b", 0.25), ("c", 0.1), ("d", 0.5)]);
    let constraints = constraints(&model, &[("a", 10), ("b", 10), ("c", 10), ("d", 10)]);
    let state = state(100, 0, 0, &[]);
    let candidate = candidate(0, &["a", "b", "c"]);
    let view = DecisionView::new(&candidate, &state, &constraints, &model);

    let base = 0.1 * (2.0 + 4.0 + 10.0);
    let score = ScoringPolicy::default().score(&view);
    assert!((score - base * 1.5 * 2.0).abs() < 1e-9, "score={score}");
}

#[test]
fn given_most_desperate_constraint_needs_every_slot_then_threshold_hits_floor() {
    let model = marginals_model(&[("a", 0.5)]);
    let constraints = constraints(&model, &[("a", 50)]);
    let state = state(100, 60, 0, &[("a", 10)]);
    let candidate = candidate(0, &[]);
    let view = DecisionView::new(&candidate, &state, &constraints, &model);

    assert!((view.max_desperation() - 1.0).abs() < f64::EPSILON);
    assert!((ScoringPolicy::default().threshold(&view) - 0.1).abs() < 1e-12);
}

#[test]
fn given_candidate_covering_every_unmet_constraint_then_full_cover_admits() {
    let model = marginals_model(&[("a", 0.9), ("b", 0.9)]);
    let constraints = constraints(&model, &[("a", 10), ("b", 10)]);
    let state = state(1000, 0, 0, &[]);
    let candidate = candidate(0, &["a", "b"]);
    let view = DecisionView::new(&candidate, &state, &constraints, &model);

    let verdict = ScoringPolicy::default().evaluate(&view);
    assert!(verdict.admit);
    assert_eq!(verdict.rule, StrategyRule::FullCover);

    let without_cover = ScoringPolicy {
        accept_full_cover: false,
        ..ScoringPolicy::default()
    };
    assert!(matches!(
        without_cover.evaluate(&view).rule,
        StrategyRule::Score { helped: 2, .. }
    ));
}

#[test]
fn given_zero_frequency_attribute_when_scoring_then_frequency_floor_applies() {
    let model = marginals_model(&[("a", 0.0)]);
    let constraints = constraints(&model, &[("a", 10)]);
    let state = state(100, 0, 0, &[]);
    let candidate = candidate(0, &["a"]);
    let view = DecisionView::new(&candidate, &state, &constraints, &model);

    assert!((view.frequency_or("a", 0.001) - 0.001).abs() < f64::EPSILON);
    let score = ScoringPolicy::default().score(&view);
    assert!((score - 0.1 / 0.001).abs() < 1e-6, "score={score}");
}
