//! Completion model client
//!
//! Talks to a hosted OpenAI-compatible chat-completions endpoint (Groq
//! in production). Calls carry a bounded timeout and a single retry for
//! transient failures; there is no unbounded blocking call anywhere.

pub mod backend;

pub use backend::{CompletionBackend, CompletionConfig};

use thiserror::Error;

/// Completion client errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<LlmError> for hcp_crm_core::Error {
    fn from(err: LlmError) -> Self {
        hcp_crm_core::Error::Completion(err.to_string())
    }
}
