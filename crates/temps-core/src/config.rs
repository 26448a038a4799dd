//! Configuration management for the data source API

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub const ENV_STACK_ID: &str = "TEMPS_STACK_ID";
pub const ENV_SKIP_CACHE: &str = "TEMPS_DATASOURCE_SKIP_CACHE";
pub const ENV_LOG_LEVEL: &str = "TEMPS_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "TEMPS_LOG_FORMAT";

/// Settings for the data source API
/// All fields have sensible defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasourceSettings {
    pub namespace: NamespaceSettings,
    pub querier: QuerierSettings,
    pub logging: LogSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamespaceSettings {
    /// When set, every organization maps to `stack-<id>`
    pub stack_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerierSettings {
    /// Bypass the data source cache on single-connection reads
    pub skip_cache: bool,
}

impl Default for QuerierSettings {
    fn default() -> Self {
        Self { skip_cache: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// trace, debug, info, warn, error
    pub level: String,
    /// compact, full
    pub format: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl DatasourceSettings {
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse data source settings")
    }

    /// Load settings from YAML and apply `TEMPS_*` environment overrides
    pub fn load(yaml: &str) -> anyhow::Result<Self> {
        let mut settings = Self::from_yaml(yaml)?;
        settings.apply_env_overrides()?;
        Ok(settings)
    }

    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(stack_id) = lookup(ENV_STACK_ID) {
            self.namespace.stack_id = Some(stack_id).filter(|id| !id.is_empty());
        }
        if let Some(raw) = lookup(ENV_SKIP_CACHE) {
            self.querier.skip_cache = raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid boolean for {}: {}", ENV_SKIP_CACHE, raw))?;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            self.logging.format = format;
        }
        Ok(())
    }
}
