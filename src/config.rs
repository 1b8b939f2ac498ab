use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use jsonschema::{JSONSchema, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    admission::{ScoringPolicy, StrategyConfig},
    error::BouncerError,
    population::ModelTolerance,
    scenario::{ScenarioDefinition, ScenarioSource, check_strategy_attributes},
    simulation::HarnessConfig,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
}

fn default_enabled_true() -> bool {
    true
}

fn default_logging_dir() -> PathBuf {
    PathBuf::from("./logs")
}

fn default_logging_filter() -> String {
    "info".to_string()
}

fn default_logging_rotation() -> LoggingRotation {
    LoggingRotation::Daily
}

fn default_logging_retention_days() -> usize {
    14
}

fn default_stderr_level() -> StderrLevel {
    StderrLevel::Warn
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LoggingRotation {
    Daily,
    Hourly,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StderrLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_logging_filter")]
    pub filter: String,
    #[serde(default = "default_logging_rotation")]
    pub rotation: LoggingRotation,
    #[serde(default = "default_logging_retention_days")]
    pub retention_days: usize,
    #[serde(default = "default_enabled_true")]
    pub file_enabled: bool,
    #[serde(default = "default_stderr_level")]
    pub stderr_level: StderrLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_logging_dir(),
            filter: default_logging_filter(),
            rotation: default_logging_rotation(),
            retention_days: default_logging_retention_days(),
            file_enabled: true,
            stderr_level: default_stderr_level(),
        }
    }
}

fn default_capacity() -> u32 {
    HarnessConfig::default().capacity
}

fn default_max_rejections() -> u32 {
    HarnessConfig::default().max_rejections
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub scenario: ScenarioSource,
    #[serde(default = "default_capacity")]
    pub capacity: u32,
    #[serde(default = "default_max_rejections")]
    pub max_rejections: u32,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub model_tolerance: ModelTolerance,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            scenario: ScenarioSource::default(),
            capacity: default_capacity(),
            max_rejections: default_max_rejections(),
            seed: None,
            model_tolerance: ModelTolerance::default(),
        }
    }
}

impl RunConfig {
    pub fn harness_config(&self) -> HarnessConfig {
        HarnessConfig {
            capacity: self.capacity,
            max_rejections: self.max_rejections,
        }
    }

    pub fn resolve_scenario(&self) -> Result<ScenarioDefinition, BouncerError> {
        self.scenario.resolve(&self.model_tolerance)
    }
}

/// Absent `strategy` falls back to the scenario's own default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub strategy: Option<StrategyConfig>,
    #[serde(default)]
    pub scoring: ScoringPolicy,
}

impl PolicyConfig {
    pub fn strategy_for(&self, scenario: &ScenarioDefinition) -> Result<StrategyConfig, BouncerError> {
        let strategy = self
            .strategy
            .clone()
            .unwrap_or_else(|| scenario.default_strategy.clone());
        check_strategy_attributes(&strategy, scenario.attribute_set())?;
        Ok(strategy)
    }
}

impl Config {
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config_value: Value = json5::from_str(&config_content)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;

        let config_base = config_path.parent().unwrap_or_else(|| Path::new("."));
        let schema_path = resolve_schema_path(config_base, &config_value)?;
        validate_against_schema(&config_value, &schema_path)?;

        let mut config: Config =
            serde_json::from_value(config_value).context("failed to deserialize bouncer config")?;

        if !config.logging.dir.is_absolute() {
            config.logging.dir = config_base.join(&config.logging.dir);
        }

        Ok(config)
    }
}

fn resolve_schema_path(config_base: &Path, config_value: &Value) -> Result<PathBuf> {
    if let Some(path_text) = config_value.get("$schema").and_then(|value| value.as_str()) {
        let configured = PathBuf::from(path_text);
        if configured.is_absolute() {
            return Ok(configured);
        }
        return Ok(config_base.join(&configured));
    }

    let local_default = config_base.join("bouncer.schema.json");
    if local_default.exists() {
        return Ok(local_default);
    }

    Err(anyhow!(
        "unable to resolve schema path: expected $schema in config or bouncer.schema.json next to it"
    ))
}

fn validate_against_schema(config_value: &Value, schema_path: &Path) -> Result<()> {
    let schema_content = fs::read_to_string(schema_path)
        .with_context(|| format!("failed to read schema {}", schema_path.display()))?;
    let schema: Value = serde_json::from_str(&schema_content)
        .with_context(|| format!("failed to parse schema {}", schema_path.display()))?;

    let compiled =
        JSONSchema::compile(&schema).map_err(|e| anyhow!("failed to compile schema: {e}"))?;

    match compiled.validate(config_value) {
        Ok(()) => Ok(()),
        Err(errors_iter) => {
            let validation_errors: Vec<ValidationError> = errors_iter.collect();
            let messages: Vec<String> = validation_errors
                .into_iter()
                .map(|error| error.to_string())
                .collect();
            Err(anyhow!("config validation failed: {}", messages.join("; ")))
        }
    }
}
