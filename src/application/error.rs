//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("chart file not found: {0}")]
    ChartNotFound(PathBuf),

    #[error("cannot parse chart {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("unsupported chart format: {0} (expected .json or .toml)")]
    UnsupportedFormat(PathBuf),

    #[error("no chart file given (use --chart or set chart_file in config)")]
    NoChart,

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
