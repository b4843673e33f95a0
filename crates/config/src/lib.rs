//! Layered configuration
//!
//! Settings load from `config/default.yaml`, then an environment
//! overlay (`config/{APP_ENV}.yaml`), then `HCP_CRM__*` environment
//! variables. Secrets like the completion API key come from the
//! environment only.

pub mod settings;

pub use settings::{
    load_settings, AgentSettings, LlmSettings, ObservabilitySettings, RouterMode, ServerSettings,
    Settings,
};

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}
