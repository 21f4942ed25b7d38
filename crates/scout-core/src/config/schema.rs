//! Configuration schema: the YAML-serializable shape of Scout's
//! configuration, independent of how it was resolved.

use serde::{Deserialize, Serialize};

/// When Scout should act on a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerType {
    Manual,
    OnSave,
    OnCommit,
    OnPush,
    Disabled,
}

impl Default for TriggerType {
    fn default() -> Self {
        Self::Manual
    }
}

/// The resolved trigger for a file: what kind of event should act on it,
/// and the dollar ceiling for that single event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerConfig {
    #[serde(rename = "type")]
    pub trigger_type: TriggerType,
    pub max_cost: f64,
}

/// One entry in `triggers.patterns`: a glob pattern, the trigger it maps
/// to, and an optional per-pattern cost ceiling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerPattern {
    pub pattern: String,
    pub trigger: TriggerType,
    #[serde(default)]
    pub max_cost: Option<f64>,
}

/// `triggers:` section. Patterns are matched in declaration order; the
/// first match wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggersConfig {
    #[serde(default)]
    pub default: TriggerType,
    #[serde(default)]
    pub patterns: Vec<TriggerPattern>,
}

impl Default for TriggersConfig {
    fn default() -> Self {
        Self {
            default: TriggerType::Manual,
            patterns: Vec::new(),
        }
    }
}

/// `limits:` section. `hard_safety_cap` is informational only -- the
/// actual, non-overridable ceiling lives in [`super::budget`] as a
/// compile-time constant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "LimitsConfig::default_max_cost_per_event")]
    pub max_cost_per_event: f64,
    #[serde(default = "LimitsConfig::default_hourly_budget")]
    pub hourly_budget: f64,
    #[serde(default)]
    pub hard_safety_cap: Option<f64>,
}

impl LimitsConfig {
    fn default_max_cost_per_event() -> f64 {
        0.10
    }

    fn default_hourly_budget() -> f64 {
        2.0
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_cost_per_event: Self::default_max_cost_per_event(),
            hourly_budget: Self::default_hourly_budget(),
            hard_safety_cap: None,
        }
    }
}

/// `models:` section. These are opaque identifiers consumed by external
/// LLM clients -- Scout's core does not validate or interpret them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelsConfig {
    #[serde(default)]
    pub primary: Option<String>,
    #[serde(default)]
    pub validator: Option<String>,
}
