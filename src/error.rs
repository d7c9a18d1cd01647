//! Error types for dimly

use thiserror::Error;

/// Result type alias for dimly operations
pub type Result<T> = std::result::Result<T, DimlyError>;

/// Dimly error types
#[derive(Error, Debug)]
pub enum DimlyError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("{0}")]
    Message(String),
}
