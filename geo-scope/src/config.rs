//! Configuration for geo-scope.

use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::error::GeoScopeError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoScopeConfig {
    /// Warehouse ingestion settings
    pub warehouse: WarehouseConfig,
    /// General settings
    pub general: GeneralConfig,
}

impl GeoScopeConfig {
    /// Load config from YAML text and validate it.
    pub fn from_yaml(yaml: &str) -> Result<Self, GeoScopeError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, GeoScopeError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), GeoScopeError> {
        self.general.max_level().map(|_| ())
    }
}

/// Warehouse ingestion configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarehouseConfig {
    /// Reject documents that need coercion instead of repairing them
    pub strict: bool,
}

/// General configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level
    pub log_level: String,
    /// Forward per-filter traces to the host console
    pub trace_filters: bool,
}

impl GeneralConfig {
    /// Most verbose level forwarded to the host console.
    pub fn max_level(&self) -> Result<Level, GeoScopeError> {
        self.log_level.trim().parse::<Level>().map_err(|_| {
            GeoScopeError::InvalidConfiguration(format!("unknown log level '{}'", self.log_level))
        })
    }

    /// Whether a message at `level` passes `log_level`. An unreadable level
    /// behaves as `info`.
    pub fn allows(&self, level: Level) -> bool {
        level <= self.max_level().unwrap_or(Level::INFO)
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            trace_filters: false,
        }
    }
}
