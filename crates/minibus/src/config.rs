use std::path::Path;
use std::str::FromStr;

use minibus_types::DATA_ATTRIBUTE_PREFIX;
use serde::{Deserialize, Serialize};

use crate::error::{BusError, BusResult};

/// Configuration for a [`MiniBus`](crate::MiniBus).
///
/// Every field has a default, so a TOML file only needs the fields it
/// changes:
///
/// ```toml
/// attribute_prefix = "data-"
/// log_snapshots = true
/// log_level = "debug"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// Only element attributes with this prefix are seeded as state.
    pub attribute_prefix: String,
    /// Log the full state as JSON at `debug` after every commit.
    pub log_snapshots: bool,
    /// Maximum level for [`init_tracing`](crate::logging::init_tracing).
    pub log_level: String,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            attribute_prefix: DATA_ATTRIBUTE_PREFIX.to_string(),
            log_snapshots: false,
            log_level: "info".to_string(),
        }
    }
}

impl BusConfig {
    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> BusResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| BusError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML configuration file.
    pub fn load(path: &Path) -> BusResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> BusResult<()> {
        if self.attribute_prefix.is_empty() {
            return Err(BusError::Config("attribute_prefix must not be empty".into()));
        }
        self.level()?;
        Ok(())
    }

    /// The configured log level.
    pub fn level(&self) -> BusResult<tracing::Level> {
        tracing::Level::from_str(&self.log_level)
            .map_err(|_| BusError::Config(format!("unknown log level: {:?}", self.log_level)))
    }
}
