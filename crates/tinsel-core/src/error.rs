//! Error types for Tinsel

use thiserror::Error;

/// The main error type for Tinsel operations
#[derive(Debug, Error)]
pub enum TinselError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Wish text produced no visible pixels: {0:?}")]
    NoCoverage(String),
}

/// Result type alias for Tinsel operations
pub type Result<T> = std::result::Result<T, TinselError>;

impl From<toml::de::Error> for TinselError {
    fn from(err: toml::de::Error) -> Self {
        TinselError::TomlParseError(err.to_string())
    }
}
