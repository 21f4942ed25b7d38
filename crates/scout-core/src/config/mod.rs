//! Layered, budget-gated configuration.
//!
//! Resolution order, lowest to highest precedence:
//! 1. hardcoded defaults ([`ScoutConfig::default`])
//! 2. `~/.scout/config.yaml` (user-global)
//! 3. `<repo>/.scout/config.yaml` (project-local)
//! 4. `SCOUT_*` environment variables
//!
//! The merge is performed over untyped [`serde_yaml::Value`] trees:
//! `Mapping` nodes are merged key-by-key (recursing into nested mappings),
//! scalars and sequences are replaced wholesale by the higher layer. Only
//! after all layers are merged is the tree deserialized into the typed
//! [`ScoutConfig`]. Unknown top-level keys survive the round trip through
//! the `extra` catch-all field.

mod budget;
mod env;
mod schema;

pub use budget::{HARD_MAX_COST_PER_EVENT, HARD_MAX_HOURLY_BUDGET};
pub use schema::{LimitsConfig, ModelsConfig, TriggerConfig, TriggerPattern, TriggerType, TriggersConfig};

use crate::error::{ScoutError, ScoutResult};
use crate::ignore::compile_glob;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::path::{Path, PathBuf};

/// Scout's fully-resolved configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoutConfig {
    #[serde(default)]
    pub triggers: TriggersConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub notifications: serde_yaml::Mapping,
    /// Unknown top-level keys, preserved verbatim so a round trip through
    /// `load` -> `save` never silently drops user configuration.
    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            triggers: TriggersConfig::default(),
            limits: LimitsConfig::default(),
            models: ModelsConfig::default(),
            notifications: serde_yaml::Mapping::new(),
            extra: serde_yaml::Mapping::new(),
        }
    }
}

impl ScoutConfig {
    /// The per-event cost ceiling of the first `triggers.patterns` entry
    /// whose glob matches `path`, if any entry both matches and declares
    /// a `max_cost`.
    pub(crate) fn matching_pattern_cost(&self, path: &Path) -> Option<f64> {
        let candidate = path.to_string_lossy();
        self.triggers
            .patterns
            .iter()
            .find(|p| {
                compile_glob(&p.pattern)
                    .map(|re| re.is_match(candidate.as_ref()))
                    .unwrap_or(false)
            })
            .and_then(|p| p.max_cost)
    }

    /// Resolve the trigger that applies to `file_path`: the first
    /// `triggers.patterns` entry whose glob matches, or `triggers.default`
    /// otherwise. The resolved cost ceiling is always run back through
    /// [`Self::effective_max_cost`] so the hard cap still applies.
    pub fn resolve_trigger(&self, file_path: &Path) -> TriggerConfig {
        let candidate = file_path.to_string_lossy();
        let matched = self.triggers.patterns.iter().find(|p| {
            compile_glob(&p.pattern)
                .map(|re| re.is_match(candidate.as_ref()))
                .unwrap_or(false)
        });

        let trigger_type = matched.map(|p| p.trigger).unwrap_or(self.triggers.default);

        TriggerConfig {
            trigger_type,
            max_cost: self.effective_max_cost(Some(file_path)),
        }
    }

    /// Read a dot-separated path (e.g. `"limits.hourly_budget"`) out of the
    /// merged configuration tree, returning its YAML representation.
    pub fn get(&self, dot_path: &str) -> ScoutResult<Option<Value>> {
        let value = serde_yaml::to_value(self).map_err(|source| ScoutError::InvalidYaml {
            path: PathBuf::from("<in-memory>"),
            source,
        })?;
        Ok(get_path(&value, dot_path))
    }

    /// Set a dot-separated path to `value`, re-deserializing into a fresh
    /// `ScoutConfig`. Fails if the result no longer matches the schema.
    pub fn set(&mut self, dot_path: &str, value: Value) -> ScoutResult<()> {
        let mut tree = serde_yaml::to_value(&*self).map_err(|source| ScoutError::InvalidYaml {
            path: PathBuf::from("<in-memory>"),
            source,
        })?;
        set_path(&mut tree, dot_path, value);
        *self = serde_yaml::from_value(tree).map_err(|source| ScoutError::InvalidYaml {
            path: PathBuf::from("<in-memory>"),
            source,
        })?;
        Ok(())
    }
}

fn get_path(value: &Value, dot_path: &str) -> Option<Value> {
    let mut cursor = value;
    for segment in dot_path.split('.') {
        cursor = cursor.as_mapping()?.get(&Value::from(segment))?;
    }
    Some(cursor.clone())
}

fn set_path(value: &mut Value, dot_path: &str, new_value: Value) {
    let segments: Vec<&str> = dot_path.split('.').collect();
    let mut cursor = value;
    for segment in &segments[..segments.len().saturating_sub(1)] {
        if !cursor.is_mapping() {
            *cursor = Value::Mapping(serde_yaml::Mapping::new());
        }
        let mapping = cursor.as_mapping_mut().expect("just ensured mapping");
        cursor = mapping
            .entry(Value::from(*segment))
            .or_insert_with(|| Value::Mapping(serde_yaml::Mapping::new()));
    }
    if let Some(last) = segments.last() {
        if !cursor.is_mapping() {
            *cursor = Value::Mapping(serde_yaml::Mapping::new());
        }
        cursor
            .as_mapping_mut()
            .expect("just ensured mapping")
            .insert(Value::from(*last), new_value);
    }
}

/// Merge `overlay` on top of `base`, recursing into mapping nodes and
/// replacing scalars/sequences wholesale.
fn merge_values(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(mut base_map), Value::Mapping(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => merge_values(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            Value::Mapping(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// Loads, merges, and validates Scout's configuration from its layered
/// sources.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    repo_root: PathBuf,
}

impl ConfigResolver {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }

    fn user_config_path() -> ScoutResult<PathBuf> {
        let home = dirs_home().ok_or(ScoutError::NoHomeDirectory)?;
        Ok(home.join(".scout").join("config.yaml"))
    }

    fn project_config_path(&self) -> PathBuf {
        self.repo_root.join(".scout").join("config.yaml")
    }

    /// The path `scout config --set` should write to: the project YAML if
    /// it already exists, otherwise the user-global YAML.
    pub fn write_target(&self) -> ScoutResult<PathBuf> {
        let project_path = self.project_config_path();
        if project_path.exists() {
            Ok(project_path)
        } else {
            Self::user_config_path()
        }
    }

    /// Load and merge all configuration layers, applying environment
    /// overrides last.
    pub fn load(&self) -> ScoutResult<ScoutConfig> {
        let mut tree = serde_yaml::to_value(ScoutConfig::default()).expect("default always serializes");

        if let Ok(user_path) = Self::user_config_path() {
            if let Some(layer) = read_yaml_layer(&user_path)? {
                tree = merge_values(tree, layer);
            }
        }

        let project_path = self.project_config_path();
        if let Some(layer) = read_yaml_layer(&project_path)? {
            tree = merge_values(tree, layer);
        }

        let mut config: ScoutConfig =
            serde_yaml::from_value(tree).map_err(|source| ScoutError::InvalidYaml {
                path: project_path,
                source,
            })?;

        env::apply_env_overrides(&mut config);
        Ok(config)
    }

    /// Re-read and re-merge all layers; equivalent to calling `load` again.
    pub fn reload(&self) -> ScoutResult<ScoutConfig> {
        self.load()
    }

    /// Parse `path` (or the project config path, if `None`) as YAML and
    /// confirm it deserializes into `ScoutConfig`. Returns the parse error
    /// rather than panicking so callers (e.g. `scout config --validate`)
    /// can report it.
    pub fn validate_yaml(&self, path: Option<&Path>) -> ScoutResult<()> {
        let target = path.map(Path::to_path_buf).unwrap_or_else(|| self.project_config_path());
        let contents =
            std::fs::read_to_string(&target).map_err(|source| ScoutError::FileRead {
                path: target.clone(),
                source,
            })?;
        let value: Value =
            serde_yaml::from_str(&contents).map_err(|source| ScoutError::InvalidYaml {
                path: target.clone(),
                source,
            })?;
        let merged = merge_values(
            serde_yaml::to_value(ScoutConfig::default()).expect("default always serializes"),
            value,
        );
        serde_yaml::from_value::<ScoutConfig>(merged)
            .map_err(|source| ScoutError::InvalidYaml { path: target, source })?;
        Ok(())
    }
}

fn read_yaml_layer(path: &Path) -> ScoutResult<Option<Value>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path).map_err(|source| ScoutError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_yaml::from_str(&contents).map_err(|source| ScoutError::InvalidYaml {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(value))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}
