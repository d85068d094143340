//! Array Node Configuration
//!
//! Settings for the array node library, loaded from a TOML file.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParseError(#[from] toml::de::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration of the array node library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrayNodesConfig {
    /// Default tracing filter, overridden by `RUST_LOG`
    pub log_filter: String,
    /// Seed for `RandomSample`; each call draws fresh entropy when unset
    pub random_seed: Option<u64>,
    /// Palette category of the array nodes
    pub category: String,
}

impl Default for ArrayNodesConfig {
    fn default() -> Self {
        Self {
            log_filter: "array_nodes=info".to_string(),
            random_seed: None,
            category: "Utilities|Array".to_string(),
        }
    }
}

impl ArrayNodesConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded array node config from {}", path.display());
        Ok(config)
    }

    /// Category of the sort node, nested under the array category
    pub fn sort_category(&self) -> String {
        format!("{}|Sort", self.category)
    }
}
