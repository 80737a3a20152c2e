use std::path::PathBuf;
use thiserror::Error;

/// Problems with a supplied configuration. Raised once, before any complaint
/// is analyzed.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("reading config from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format `{0}` (expected .toml or .json)")]
    UnsupportedFormat(String),
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("term `{term}` ({owner}) does not compile: {source}")]
    Pattern {
        owner: String,
        term: String,
        #[source]
        source: regex::Error,
    },
}

/// A single input record that cannot be analyzed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("record {record}: missing required field `complaint_text`")]
    MissingText { record: String },
    #[error("record {record}: malformed input: {reason}")]
    Malformed { record: String, reason: String },
}

impl ValidationError {
    /// Identifier of the offending record (`complaint_id` or `#<index>`).
    pub fn record(&self) -> &str {
        match self {
            ValidationError::MissingText { record } => record,
            ValidationError::Malformed { record, .. } => record,
        }
    }
}
