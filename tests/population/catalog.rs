use bouncer::{
    arrival::ArrivalGenerator,
    population::{ModelTolerance, SamplingMode},
    scenario::{BUILTIN_SCENARIO_IDS, ScenarioSource, builtin, detect},
};

#[test]
fn given_builtin_scenarios_when_marginalized_then_joint_tables_match_declared_frequencies() {
    for id in BUILTIN_SCENARIO_IDS {
        let scenario = builtin(id, &ModelTolerance::default()).expect("builtin should load");
        let table = scenario.model.joint().expect("builtins carry joint tables");
        assert!((table.total_mass() - 1.0).abs() <= 1e-4, "scenario {id}");
        for (attribute, declared) in scenario.model.marginal_frequencies() {
            let derived = table.marginal(attribute).expect("attribute in table");
            assert!(
                (derived - declared).abs() <= 0.01,
                "scenario {id} attribute {attribute}: derived {derived}, declared {declared}"
            );
        }
    }
}

#[test]
fn given_builtin_scenario_when_statistics_published_then_correlations_are_symmetric() {
    let scenario = builtin(3, &ModelTolerance::default()).expect("builtin should load");
    let statistics = scenario.model.statistics();
    let correlations = statistics.correlations.expect("declared correlations");

    assert_eq!(correlations.len(), 6);
    for (row, columns) in &correlations {
        assert_eq!(columns[row], 1.0);
        for (column, coefficient) in columns {
            assert_eq!(correlations[column][row], *coefficient);
        }
    }
    assert!((correlations["international"]["german_speaker"] + 0.7172529382519395).abs() < 1e-12);
}

#[test]
fn given_builtin_attribute_set_when_detected_then_scenario_id_round_trips() {
    for id in BUILTIN_SCENARIO_IDS {
        let scenario = builtin(id, &ModelTolerance::default()).expect("builtin should load");
        let mut names = scenario.attribute_set().names().to_vec();
        names.reverse();
        assert_eq!(detect(&names).expect("detect"), id);
    }
}

#[test]
fn given_scenario_two_when_sampling_then_rare_creative_marginal_is_reproduced() {
    let scenario = builtin(2, &ModelTolerance::default()).expect("builtin should load");
    let expected = scenario
        .model
        .joint()
        .and_then(|table| table.marginal("creative"))
        .expect("creative marginal");
    let mut generator = ArrivalGenerator::seeded(scenario.model.clone(), 2);

    let draws = 100_000;
    let creative = (0..draws)
        .filter(|_| generator.draw()["creative"])
        .count();

    let frequency = creative as f64 / draws as f64;
    assert!((frequency - expected).abs() <= 0.01, "creative frequency {frequency}");
}

#[test]
fn given_custom_scenario_with_joint_table_when_resolved_then_joint_sampling_is_used() {
    let source: ScenarioSource = serde_json::from_value(serde_json::json!({
        "type": "custom",
        "label": "warehouse",
        "attributes": ["a", "b"],
        "constraints": [{"attribute": "a", "minCount": 5}, {"attribute": "b", "minCount": 5}],
        "relative_frequencies": {"a": 0.32, "b": 0.32},
        "joint": {
            "attribute_order": ["a", "b"],
            "entries": [
                {"outcome": [false, false], "probability": 0.50},
                {"outcome": [false, true], "probability": 0.18},
                {"outcome": [true, false], "probability": 0.18},
                {"outcome": [true, true], "probability": 0.14}
            ]
        }
    }))
    .expect("custom scenario should parse");

    let scenario = source
        .resolve(&ModelTolerance::default())
        .expect("custom scenario should resolve");
    assert_eq!(scenario.model.sampling_mode(), SamplingMode::Joint);
    assert_eq!(scenario.constraints.len(), 2);
}

#[test]
fn given_custom_joint_table_with_short_mass_when_resolved_then_invariant_violation() {
    let source: ScenarioSource = serde_json::from_value(serde_json::json!({
        "type": "custom",
        "label": "warehouse",
        "attributes": ["a"],
        "constraints": [],
        "relative_frequencies": {"a": 0.4},
        "joint": {
            "attribute_order": ["a"],
            "entries": [
                {"outcome": [false], "probability": 0.5},
                {"outcome": [true], "probability": 0.4}
            ]
        }
    }))
    .expect("custom scenario should parse");

    let err = source
        .resolve(&ModelTolerance::default())
        .expect_err("short table should fail");
    assert!(err.is_invariant_violation());
}
