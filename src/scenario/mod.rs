pub mod catalog;
mod tables;

pub use catalog::{
    BUILTIN_SCENARIO_IDS, CustomScenario, ScenarioDefinition, ScenarioSource, builtin,
    check_builtin_label, check_strategy_attributes, custom_scenario, detect,
};
