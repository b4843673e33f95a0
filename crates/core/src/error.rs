//! Error types shared across crates

use thiserror::Error;

/// Top-level error for the CRM core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Completion error: {0}")]
    Completion(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Routing error: {0}")]
    Routing(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Extraction(err.to_string())
    }
}
