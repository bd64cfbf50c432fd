//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine configuration loaded from a YAML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Base tick cadence: ticks between engine updates for sessions that do
    /// not declare their own cadence. Must be positive.
    pub tick_interval: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { tick_interval: 20 }
    }
}

impl EngineConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> crate::Result<Self> {
        let config: EngineConfig =
            serde_yaml::from_str(yaml).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> crate::Result<()> {
        if self.tick_interval == 0 {
            return Err(crate::Error::Config(
                "tick_interval must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
