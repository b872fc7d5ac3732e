//! Error types for the contrast core
//!
//! Only the data-source, cache and configuration layers produce errors.
//! Lookups and projections never fail: they degrade to "not available" results.

use thiserror::Error;

/// Errors that can occur while loading or configuring the dashboard
#[derive(Error, Debug)]
pub enum ContrastError {
    /// Data source unreachable or answered with a non-success status
    #[error("Connection error: {0}")]
    Connection(String),

    /// The data source answered but reported a failure for one table
    #[error("Source error for table {table}: {message}")]
    Source { table: String, message: String },

    /// Every table load failed
    #[error("Data source unreachable: all {0} table loads failed")]
    AllTablesFailed(usize),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML configuration parse error
    #[error("Configuration parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Local cache store error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Configuration error (invalid settings or unusable reference data)
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type ContrastResult<T> = Result<T, ContrastError>;
