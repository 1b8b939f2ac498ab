use bouncer::{
    admission::{
        AdmissionController, AdmissionStrategy, AdmissionWhy, DecisionView,
        FixedPriorityStrategy, PhaseWindowStrategy, ScoringPolicy, StrategyConfig, StrategyRule,
        WindowUnit,
    },
    population::ModelTolerance,
    scenario::builtin,
};

use crate::{candidate, constraints, marginals_model, state};

#[test]
fn given_priority_attribute_when_candidate_carries_it_then_admitted_without_scoring() {
    let model = marginals_model(&[
        ("techno_lover", 0.6265),
        ("well_connected", 0.47),
        ("creative", 0.06227),
        ("berlin_local", 0.398),
    ]);
    let constraints = constraints(
        &model,
        &[
            ("techno_lover", 650),
            ("well_connected", 450),
            ("creative", 300),
            ("berlin_local", 750),
        ],
    );
    let state = state(1000, 0, 0, &[]);
    let controller = AdmissionController::from_config(
        &StrategyConfig::FixedPriorityAttribute {
            priority_attributes: vec!["creative".to_string()],
            reserved_attribute: None,
            reserve_margin: 0,
        },
        ScoringPolicy::default(),
    );

    let decision = controller.evaluate(&candidate(0, &["creative"]), &state, &constraints, &model);

    assert!(decision.admit);
    assert_eq!(
        decision.why,
        AdmissionWhy::Strategy {
            strategy: "fixed_priority_attribute".to_string(),
            rule: StrategyRule::PriorityAttribute {
                attribute: "creative".to_string()
            },
        }
    );
}

#[test]
fn given_reserved_slots_used_up_when_non_carrier_arrives_then_rejected() {
    let model = marginals_model(&[("german_speaker", 0.4565), ("international", 0.5735)]);
    let constraints = constraints(&model, &[("german_speaker", 8), ("international", 1)]);
    let state = state(10, 1, 0, &[("german_speaker", 0), ("international", 0)]);
    let strategy = FixedPriorityStrategy::new(
        Vec::new(),
        Some("german_speaker".to_string()),
        1,
        ScoringPolicy::default(),
    );
    let candidate = candidate(1, &["international"]);
    let view = DecisionView::new(&candidate, &state, &constraints, &model);

    assert!(view.first_infeasible().is_none());
    let verdict = strategy.evaluate(&view);
    assert!(!verdict.admit);
    assert_eq!(
        verdict.rule,
        StrategyRule::ReservedSlotsExhausted {
            attribute: "german_speaker".to_string()
        }
    );
}

#[test]
fn given_reserved_attribute_carrier_when_slots_used_up_then_scoring_still_applies() {
    let model = marginals_model(&[("german_speaker", 0.4565), ("international", 0.5735)]);
    let constraints = constraints(&model, &[("german_speaker", 8), ("international", 1)]);
    let state = state(10, 1, 0, &[("german_speaker", 0), ("international", 0)]);
    let strategy = FixedPriorityStrategy::new(
        Vec::new(),
        Some("german_speaker".to_string()),
        1,
        ScoringPolicy::default(),
    );
    let candidate = candidate(1, &["german_speaker", "international"]);
    let view = DecisionView::new(&candidate, &state, &constraints, &model);

    let verdict = strategy.evaluate(&view);
    assert!(verdict.admit);
    assert_eq!(verdict.rule, StrategyRule::FullCover);
}

#[test]
fn given_phase_window_open_when_candidates_arrive_then_only_constrained_carriers_admitted() {
    let model = marginals_model(&[("young", 0.3149), ("well_dressed", 0.3223)]);
    let constraints = constraints(&model, &[("young", 600), ("well_dressed", 600)]);
    let state = state(1000, 10, 20, &[("young", 5), ("well_dressed", 5)]);
    let strategy = PhaseWindowStrategy::new(1_200, WindowUnit::Admissions);

    let plain = candidate(30, &[]);
    let young = candidate(31, &["young"]);

    let rejected = strategy.evaluate(&DecisionView::new(&plain, &state, &constraints, &model));
    assert!(!rejected.admit);
    assert_eq!(
        rejected.rule,
        StrategyRule::PhaseWindow {
            carries_constrained_attribute: false
        }
    );

    let admitted = strategy.evaluate(&DecisionView::new(&young, &state, &constraints, &model));
    assert!(admitted.admit);
}

#[test]
fn given_decision_window_closed_when_slack_is_short_then_unhelpful_candidate_rejected() {
    let model = marginals_model(&[("young", 0.3149), ("well_dressed", 0.3223)]);
    let constraints = constraints(&model, &[("young", 600), ("well_dressed", 600)]);
    let state = state(1000, 100, 1_200, &[("young", 50), ("well_dressed", 50)]);
    let strategy = PhaseWindowStrategy::new(1_200, WindowUnit::Decisions);
    let plain = candidate(1_300, &[]);
    let view = DecisionView::new(&plain, &state, &constraints, &model);

    let verdict = strategy.evaluate(&view);
    assert!(!verdict.admit);
    assert_eq!(
        verdict.rule,
        StrategyRule::SlackCoverage {
            remaining_slots: 899,
            total_needed: 1_100,
        }
    );
}

#[test]
fn given_decision_window_closed_when_slack_covers_need_then_unhelpful_candidate_admitted() {
    let model = marginals_model(&[("young", 0.3149), ("well_dressed", 0.3223)]);
    let constraints = constraints(&model, &[("young", 600), ("well_dressed", 600)]);
    let state = state(1000, 300, 1_200, &[("young", 290), ("well_dressed", 290)]);
    let strategy = PhaseWindowStrategy::new(1_200, WindowUnit::Decisions);
    let plain = candidate(1_500, &[]);
    let young = candidate(1_501, &["young"]);

    assert!(
        strategy
            .evaluate(&DecisionView::new(&plain, &state, &constraints, &model))
            .admit
    );
    assert_eq!(
        strategy
            .evaluate(&DecisionView::new(&young, &state, &constraints, &model))
            .rule,
        StrategyRule::CarrierAfterWindow
    );
}

#[test]
fn given_admission_window_when_many_rejections_then_window_stays_open() {
    let scenario = builtin(1, &ModelTolerance::default()).expect("builtin should load");
    let controller =
        AdmissionController::from_config(&scenario.default_strategy, ScoringPolicy::default());
    let state = state(1000, 500, 800, &[("young", 400), ("well_dressed", 400)]);

    let plain = controller.evaluate(
        &candidate(1_300, &[]),
        &state,
        &scenario.constraints,
        &scenario.model,
    );
    assert!(!plain.admit);
    assert_eq!(
        plain.why,
        AdmissionWhy::Strategy {
            strategy: "phase_window".to_string(),
            rule: StrategyRule::PhaseWindow {
                carries_constrained_attribute: false
            },
        }
    );

    let young = controller.evaluate(
        &candidate(1_301, &["young"]),
        &state,
        &scenario.constraints,
        &scenario.model,
    );
    assert!(young.admit);
}

#[test]
fn given_admission_window_when_capacity_is_below_window_then_never_closes() {
    let model = marginals_model(&[("young", 0.3149), ("well_dressed", 0.3223)]);
    let constraints = constraints(&model, &[("young", 600), ("well_dressed", 600)]);
    let state = state(1000, 999, 5_000, &[("young", 599), ("well_dressed", 599)]);
    let strategy = PhaseWindowStrategy::new(1_200, WindowUnit::Admissions);
    let plain = candidate(6_000, &[]);

    let verdict = strategy.evaluate(&DecisionView::new(&plain, &state, &constraints, &model));
    assert_eq!(
        verdict.rule,
        StrategyRule::PhaseWindow {
            carries_constrained_attribute: false
        }
    );
}

#[test]
fn given_window_closed_when_candidate_carries_only_a_met_attribute_then_admitted_as_carrier() {
    let model = marginals_model(&[("young", 0.3149), ("well_dressed", 0.3223)]);
    let constraints = constraints(&model, &[("young", 600), ("well_dressed", 600)]);
    let state = state(1000, 650, 1_300, &[("young", 600), ("well_dressed", 400)]);
    let strategy = PhaseWindowStrategy::new(1_200, WindowUnit::Decisions);
    let young = candidate(1_950, &["young"]);
    let view = DecisionView::new(&young, &state, &constraints, &model);

    assert_eq!(view.helped_count(), 0);
    let verdict = strategy.evaluate(&view);
    assert!(verdict.admit);
    assert_eq!(verdict.rule, StrategyRule::CarrierAfterWindow);
}

#[test]
fn given_strategy_config_when_built_then_controller_reports_its_name() {
    let cases = [
        (StrategyConfig::ScarcityScore, "scarcity_score"),
        (
            StrategyConfig::PhaseWindow {
                window: 5,
                window_unit: WindowUnit::Decisions,
            },
            "phase_window",
        ),
        (
            StrategyConfig::FixedPriorityAttribute {
                priority_attributes: vec!["a".to_string()],
                reserved_attribute: None,
                reserve_margin: 0,
            },
            "fixed_priority_attribute",
        ),
    ];
    for (config, name) in cases {
        let controller = AdmissionController::from_config(&config, ScoringPolicy::default());
        assert_eq!(controller.strategy_name(), name);
    }
}
