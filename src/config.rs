//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treelog-dot/treelog-dot.toml`
//! 3. Local config: `<treelog_dir>/.treelog-dot.toml` (next to the treelog)
//! 4. Environment variables: `TREELOG_DOT_*` prefix, `__` between sections
//!    (e.g. `TREELOG_DOT_POLICY__DUPLICATE_NAMES=strict`)

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// What to do about a recoverable anomaly in the treelog.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyPolicy {
    /// Drop silently (debug log only)
    Ignore,
    /// Drop and print a warning on stderr
    #[default]
    Warn,
    /// Abort the run
    Strict,
}

impl FromStr for AnomalyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "warn" => Ok(Self::Warn),
            "strict" => Ok(Self::Strict),
            other => Err(format!(
                "unknown policy '{}', expected ignore, warn or strict",
                other
            )),
        }
    }
}

impl fmt::Display for AnomalyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ignore => write!(f, "ignore"),
            Self::Warn => write!(f, "warn"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

/// Graph rendering options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Label interior nodes with their core features too (leaves always are)
    pub core_features: bool,
    /// Graphviz node shape
    pub node_shape: String,
    pub compound: bool,
    pub concentrate: bool,
    /// Rank separation in inches
    pub ranksep: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            core_features: false,
            node_shape: "box".into(),
            compound: true,
            concentrate: true,
            ranksep: 1.0,
        }
    }
}

/// Handling of the anomalies a treelog can contain.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PolicyConfig {
    /// Two blocks with the same node name (last one wins)
    pub duplicate_names: AnomalyPolicy,
    /// Records whose name is not reachable from `Root`
    pub unreachable_records: AnomalyPolicy,
    /// Final block not closed by a blank line
    pub unterminated_block: AnomalyPolicy,
}

impl PolicyConfig {
    /// Every anomaly aborts the run.
    pub fn strict() -> Self {
        Self {
            duplicate_names: AnomalyPolicy::Strict,
            unreachable_records: AnomalyPolicy::Strict,
            unterminated_block: AnomalyPolicy::Strict,
        }
    }
}

/// Raw render config for intermediate parsing (`None` = not specified).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRenderConfig {
    pub core_features: Option<bool>,
    pub node_shape: Option<String>,
    pub compound: Option<bool>,
    pub concentrate: Option<bool>,
    pub ranksep: Option<f64>,
}

/// Raw policy config for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawPolicyConfig {
    pub duplicate_names: Option<AnomalyPolicy>,
    pub unreachable_records: Option<AnomalyPolicy>,
    pub unterminated_block: Option<AnomalyPolicy>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub render: RawRenderConfig,
    pub policy: RawPolicyConfig,
}

impl RenderConfig {
    /// Overlay wins where it specifies a value.
    pub fn merge(&self, overlay: &RawRenderConfig) -> Self {
        Self {
            core_features: overlay.core_features.unwrap_or(self.core_features),
            node_shape: overlay
                .node_shape
                .clone()
                .unwrap_or_else(|| self.node_shape.clone()),
            compound: overlay.compound.unwrap_or(self.compound),
            concentrate: overlay.concentrate.unwrap_or(self.concentrate),
            ranksep: overlay.ranksep.unwrap_or(self.ranksep),
        }
    }
}

impl PolicyConfig {
    pub fn merge(&self, overlay: &RawPolicyConfig) -> Self {
        Self {
            duplicate_names: overlay.duplicate_names.unwrap_or(self.duplicate_names),
            unreachable_records: overlay
                .unreachable_records
                .unwrap_or(self.unreachable_records),
            unterminated_block: overlay
                .unterminated_block
                .unwrap_or(self.unterminated_block),
        }
    }
}

/// Unified configuration for treelog-dot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub render: RenderConfig,
    pub policy: PolicyConfig,
}

/// Get the XDG config directory for treelog-dot.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treelog-dot").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treelog-dot.toml"))
}

/// Get the path to the local config file next to a treelog.
pub fn local_config_path(treelog_dir: &Path) -> PathBuf {
    treelog_dir.join(".treelog-dot.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

fn policy_err(key: &str, message: String) -> ApplicationError {
    ApplicationError::Config {
        message: format!("{}: {}", key, message),
    }
}

impl Settings {
    /// Overlay config onto self (base). Scalars: overlay wins if `Some`.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            render: self.render.merge(&overlay.render),
            policy: self.policy.merge(&overlay.policy),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `treelog_dir` - Directory of the treelog being rendered, searched for a local config
    pub fn load(treelog_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config next to the treelog
        if let Some(dir) = treelog_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables (explicit override)
        Self::apply_env_overrides(current)
    }

    /// Load settings from a single TOML file on top of the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ApplicationError> {
        let raw = load_raw_settings(path)?;
        Ok(Self::default().merge_with(&raw))
    }

    /// Apply TREELOG_DOT_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("TREELOG_DOT")
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_bool("render.core_features") {
            settings.render.core_features = val;
        }
        if let Ok(val) = config.get_string("render.node_shape") {
            settings.render.node_shape = val;
        }
        if let Ok(val) = config.get_bool("render.compound") {
            settings.render.compound = val;
        }
        if let Ok(val) = config.get_bool("render.concentrate") {
            settings.render.concentrate = val;
        }
        if let Ok(val) = config.get_float("render.ranksep") {
            settings.render.ranksep = val;
        }
        for (key, slot) in [
            (
                "policy.duplicate_names",
                &mut settings.policy.duplicate_names,
            ),
            (
                "policy.unreachable_records",
                &mut settings.policy.unreachable_records,
            ),
            (
                "policy.unterminated_block",
                &mut settings.policy.unterminated_block,
            ),
        ] {
            if let Ok(val) = config.get_string(key) {
                *slot = val.parse().map_err(|e| policy_err(key, e))?;
            }
        }

        Ok(settings)
    }
}
