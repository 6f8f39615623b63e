//! Error types for the ingestion and configuration boundary.
//!
//! The filters themselves never fail; only turning outside text into typed
//! data can.

/// Errors raised at the edges of the crate.
#[derive(Debug, thiserror::Error)]
pub enum GeoScopeError {
    /// Input text was not valid JSON
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration text was not valid YAML for the config schema
    #[error("Invalid configuration document: {0}")]
    Config(#[from] serde_yaml::Error),

    /// Strict ingestion found records that would otherwise be coerced
    #[error("Malformed warehouse: {0}")]
    Malformed(String),

    /// Configuration parsed but holds an unusable value
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
