use std::{collections::BTreeMap, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    admission::{StrategyConfig, WindowUnit},
    error::{BouncerError, configuration_error},
    population::{
        CorrelationMatrix, JointEntry, JointTable, JointTableSpec, ModelTolerance, PopulationModel,
    },
    scenario::tables,
    types::{AttributeName, AttributeSet, Constraint, ConstraintSet},
};

pub const BUILTIN_SCENARIO_IDS: [u8; 3] = [1, 2, 3];

/// Everything a harness and a controller need to play one venue.
#[derive(Debug, Clone)]
pub struct ScenarioDefinition {
    pub label: String,
    pub constraints: ConstraintSet,
    pub model: Arc<PopulationModel>,
    pub default_strategy: StrategyConfig,
}

impl ScenarioDefinition {
    pub fn attribute_set(&self) -> &AttributeSet {
        self.model.attribute_set()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomScenario {
    pub label: String,
    pub attributes: Vec<AttributeName>,
    pub constraints: Vec<Constraint>,
    pub relative_frequencies: BTreeMap<AttributeName, f64>,
    #[serde(default)]
    pub correlations: Option<CorrelationMatrix>,
    #[serde(default)]
    pub joint: Option<JointTableSpec>,
    #[serde(default)]
    pub default_strategy: Option<StrategyConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioSource {
    Builtin { id: u8 },
    Custom(CustomScenario),
}

impl Default for ScenarioSource {
    fn default() -> Self {
        Self::Builtin { id: 1 }
    }
}

impl ScenarioSource {
    pub fn resolve(&self, tolerance: &ModelTolerance) -> Result<ScenarioDefinition, BouncerError> {
        match self {
            Self::Builtin { id } => builtin(*id, tolerance),
            Self::Custom(custom) => custom_scenario(custom, tolerance),
        }
    }
}

pub fn builtin(id: u8, tolerance: &ModelTolerance) -> Result<ScenarioDefinition, BouncerError> {
    match id {
        1 => assemble(
            id,
            &[("young", 600), ("well_dressed", 600)],
            &tables::SCENARIO_1_FREQUENCIES,
            &tables::SCENARIO_1_ORDER,
            &tables::SCENARIO_1_JOINT,
            &tables::SCENARIO_1_CORRELATIONS,
            StrategyConfig::PhaseWindow {
                window: 1_200,
                window_unit: WindowUnit::Admissions,
            },
            tolerance,
        ),
        2 => assemble(
            id,
            &[
                ("techno_lover", 650),
                ("well_connected", 450),
                ("creative", 300),
                ("berlin_local", 750),
            ],
            &tables::SCENARIO_2_FREQUENCIES,
            &tables::SCENARIO_2_ORDER,
            &tables::SCENARIO_2_JOINT,
            &tables::SCENARIO_2_CORRELATIONS,
            StrategyConfig::FixedPriorityAttribute {
                priority_attributes: vec!["creative".to_string()],
                reserved_attribute: None,
                reserve_margin: 0,
            },
            tolerance,
        ),
        3 => assemble(
            id,
            &[
                ("underground_veteran", 500),
                ("international", 650),
                ("fashion_forward", 550),
                ("queer_friendly", 250),
                ("vinyl_collector", 200),
                ("german_speaker", 800),
            ],
            &tables::SCENARIO_3_FREQUENCIES,
            &tables::SCENARIO_3_ORDER,
            &tables::SCENARIO_3_JOINT,
            &tables::SCENARIO_3_CORRELATIONS,
            StrategyConfig::FixedPriorityAttribute {
                priority_attributes: vec![
                    "queer_friendly".to_string(),
                    "vinyl_collector".to_string(),
                ],
                reserved_attribute: Some("german_speaker".to_string()),
                reserve_margin: 0,
            },
            tolerance,
        ),
        other => Err(configuration_error(format!(
            "unknown built-in scenario {}, expected one of {:?}",
            other, BUILTIN_SCENARIO_IDS
        ))),
    }
}

/// Maps an attribute set, in any order, to the built-in scenario tracking it.
pub fn detect<S: AsRef<str>>(attributes: &[S]) -> Result<u8, BouncerError> {
    let matches = |order: &[&str]| {
        order.len() == attributes.len()
            && attributes
                .iter()
                .all(|attribute| order.contains(&attribute.as_ref()))
    };

    if matches(&tables::SCENARIO_1_ORDER[..]) {
        return Ok(1);
    }
    if matches(&tables::SCENARIO_2_ORDER[..]) {
        return Ok(2);
    }
    if matches(&tables::SCENARIO_3_ORDER[..]) {
        return Ok(3);
    }

    let names: Vec<&str> = attributes.iter().map(AsRef::as_ref).collect();
    Err(configuration_error(format!(
        "attribute set {:?} does not match any built-in scenario",
        names
    )))
}

/// A run started under a built-in label must publish that scenario's
/// attributes. Other labels are not checked.
pub fn check_builtin_label(label: &str, attribute_set: &AttributeSet) -> Result<(), BouncerError> {
    let Some(id) = label
        .parse::<u8>()
        .ok()
        .filter(|id| BUILTIN_SCENARIO_IDS.contains(id))
    else {
        return Ok(());
    };

    let detected = detect(attribute_set.names())?;
    if detected != id {
        return Err(configuration_error(format!(
            "scenario '{}' was requested but the published attributes belong to scenario {}",
            label, detected
        )));
    }
    Ok(())
}

pub fn custom_scenario(
    custom: &CustomScenario,
    tolerance: &ModelTolerance,
) -> Result<ScenarioDefinition, BouncerError> {
    if custom.label.trim().is_empty() {
        return Err(configuration_error("custom scenario label cannot be blank"));
    }

    let attribute_set = AttributeSet::new(custom.attributes.iter().cloned())?;
    let constraints = ConstraintSet::new(custom.constraints.clone(), &attribute_set)?;
    let joint = custom
        .joint
        .clone()
        .map(|spec| JointTable::from_spec(spec, tolerance))
        .transpose()?;
    let model = PopulationModel::new(
        attribute_set,
        custom.relative_frequencies.clone(),
        joint,
        custom.correlations.clone(),
        tolerance,
    )?;

    let default_strategy = custom.default_strategy.clone().unwrap_or_default();
    check_strategy_attributes(&default_strategy, model.attribute_set())?;

    Ok(ScenarioDefinition {
        label: custom.label.clone(),
        constraints,
        model: Arc::new(model),
        default_strategy,
    })
}

pub fn check_strategy_attributes(
    strategy: &StrategyConfig,
    attribute_set: &AttributeSet,
) -> Result<(), BouncerError> {
    if let Some(unknown) = strategy
        .attributes()
        .into_iter()
        .find(|attribute| !attribute_set.contains(attribute))
    {
        return Err(configuration_error(format!(
            "strategy refers to attribute '{}' outside the attribute set",
            unknown
        )));
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn assemble<const N: usize, const M: usize>(
    id: u8,
    constraints: &[(&str, u32)],
    frequencies: &[(&str, f64); N],
    order: &[&str; N],
    joint: &[([bool; N], f64); M],
    correlations: &[(&str, &str, f64)],
    default_strategy: StrategyConfig,
    tolerance: &ModelTolerance,
) -> Result<ScenarioDefinition, BouncerError> {
    let attribute_set = AttributeSet::new(frequencies.iter().map(|(name, _)| *name))?;
    let constraints = ConstraintSet::new(
        constraints
            .iter()
            .map(|(attribute, min_count)| Constraint::new(*attribute, *min_count))
            .collect(),
        &attribute_set,
    )?;

    let table = JointTable::new(
        order.iter().map(|name| name.to_string()).collect(),
        joint
            .iter()
            .map(|(outcome, probability)| JointEntry::new(*outcome, *probability))
            .collect(),
        tolerance,
    )?;

    let mut matrix = CorrelationMatrix::new();
    for name in attribute_set.iter() {
        matrix
            .entry(name.to_string())
            .or_default()
            .insert(name.to_string(), 1.0);
    }
    for (lhs, rhs, coefficient) in correlations {
        matrix
            .entry(lhs.to_string())
            .or_default()
            .insert(rhs.to_string(), *coefficient);
        matrix
            .entry(rhs.to_string())
            .or_default()
            .insert(lhs.to_string(), *coefficient);
    }

    let model = PopulationModel::new(
        attribute_set,
        frequencies
            .iter()
            .map(|(name, frequency)| (name.to_string(), *frequency))
            .collect(),
        Some(table),
        Some(matrix),
        tolerance,
    )?;

    Ok(ScenarioDefinition {
        label: id.to_string(),
        constraints,
        model: Arc::new(model),
        default_strategy,
    })
}
