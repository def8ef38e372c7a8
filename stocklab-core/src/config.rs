//! Engine configuration, loadable from TOML.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Engine-wide settings. Every field has a default, so an empty file (or no
/// file at all) is a valid configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Currency all valuations and returns are reported in.
    pub target_currency: String,

    /// Trailing calendar window requested when looking for the last two
    /// closes. Five days always spans a weekend plus one holiday.
    pub quote_lookback_days: u32,

    /// Default portfolio owner name.
    pub owner: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_currency: "SGD".to_string(),
            quote_lookback_days: 5,
            owner: None,
        }
    }
}

impl EngineConfig {
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }
}
