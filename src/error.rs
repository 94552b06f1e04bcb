//! Error types for domains2providers.

use thiserror::Error;

/// Error type for domains2providers operations.
///
/// Malformed source lines are never reported here: the line classifier
/// discards them silently.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Download error
    #[error("download error: {0}")]
    Download(#[from] reqwest::Error),

    /// Non-success HTTP status from a rule source
    #[error("load {url}: response status {status}")]
    Status { url: String, status: u16 },

    /// Source identifier not known to the line source
    #[error("unknown source: {0}")]
    UnknownSource(String),

    /// Invalid behavior tag
    #[error("invalid behavior: {0} (expected `domain` or `ipcidr`)")]
    InvalidBehavior(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Geosite list referenced but not present in the data directory
    #[error("unknown geosite list: {0}")]
    UnknownList(String),

    /// Geosite include chain loops back on itself
    #[error("include cycle: {0}")]
    IncludeCycle(String),
}

/// Result type alias for domains2providers operations.
pub type Result<T> = std::result::Result<T, Error>;
