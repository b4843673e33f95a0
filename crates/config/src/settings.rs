//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation, warnings only
    #[default]
    Development,
    Staging,
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Routing strategy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RouterMode {
    /// Prefix-marked pattern cascade, no model call for routing.
    #[default]
    Simple,
    /// Model-backed semantic routing with keyword fallback.
    Intelligent,
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerSettings,

    /// Completion backend configuration
    #[serde(default)]
    pub llm: LlmSettings,

    /// Assistant behavior
    #[serde(default)]
    pub agent: AgentSettings,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilitySettings,
}

impl Settings {
    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        if self.llm.endpoint.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "llm.endpoint".to_string(),
                message: "Endpoint cannot be empty".to_string(),
            });
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "llm.temperature".to_string(),
                message: format!("Must be between 0.0 and 2.0, got {}", self.llm.temperature),
            });
        }

        if self.agent.task_prefix.chars().count() != 1 {
            return Err(ConfigError::InvalidValue {
                field: "agent.task_prefix".to_string(),
                message: "Must be a single character".to_string(),
            });
        }

        if self.agent.insights_default_days <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "agent.insights_default_days".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if self.environment.is_production() && self.llm.api_key.is_none() {
            tracing::warn!(
                "No completion API key configured in production; requests will be sent unauthenticated"
            );
        }

        if self.environment.is_production() && self.server.cors_enabled && self.server.cors_origins.is_empty()
        {
            tracing::warn!(
                "CORS is enabled in production but no origins are configured. \
                 This may block legitimate requests."
            );
        }

        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_timeout() -> u64 {
    60
}
fn default_true() -> bool {
    true
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_seconds: default_timeout(),
            cors_enabled: default_true(),
            // Empty by default - must be explicitly configured for production
            cors_origins: Vec::new(),
        }
    }
}

/// Completion backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// OpenAI-compatible chat completions base URL
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    /// Model identifier
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// API key (set via HCP_CRM__LLM__API_KEY env var)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-call timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_seconds: u64,

    /// Retries after a transient failure
    #[serde(default = "default_llm_retries")]
    pub max_retries: u32,

    /// Sampling temperature
    #[serde(default = "default_llm_temperature")]
    pub temperature: f32,

    /// Completion token cap
    #[serde(default = "default_llm_max_tokens")]
    pub max_tokens: u32,
}

fn default_llm_endpoint() -> String {
    "https://api.groq.com/openai/v1".to_string()
}
fn default_llm_model() -> String {
    "gemma2-9b-it".to_string()
}
fn default_llm_timeout() -> u64 {
    30
}
fn default_llm_retries() -> u32 {
    1
}
fn default_llm_temperature() -> f32 {
    0.1
}
fn default_llm_max_tokens() -> u32 {
    1024
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            model: default_llm_model(),
            api_key: None,
            timeout_seconds: default_llm_timeout(),
            max_retries: default_llm_retries(),
            temperature: default_llm_temperature(),
            max_tokens: default_llm_max_tokens(),
        }
    }
}

/// Assistant behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Routing strategy
    #[serde(default)]
    pub router_mode: RouterMode,

    /// Character marking a message as a task command
    #[serde(default = "default_task_prefix")]
    pub task_prefix: String,

    /// Default insights window in days
    #[serde(default = "default_insights_days")]
    pub insights_default_days: i64,
}

fn default_task_prefix() -> String {
    "-".to_string()
}
fn default_insights_days() -> i64 {
    30
}

impl AgentSettings {
    /// The prefix as a char; validated to be single-character.
    pub fn prefix_char(&self) -> char {
        self.task_prefix.chars().next().unwrap_or('-')
    }
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            router_mode: RouterMode::default(),
            task_prefix: default_task_prefix(),
            insights_default_days: default_insights_days(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilitySettings {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,

    /// Enable metrics
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilitySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (HCP_CRM prefix)
/// 2. config/{env}.yaml (if env specified)
/// 3. config/default.yaml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("HCP_CRM")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.agent.router_mode, RouterMode::Simple);
        assert_eq!(settings.agent.prefix_char(), '-');
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_port_validation() {
        let mut settings = Settings::default();
        settings.server.port = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_temperature_bounds() {
        let mut settings = Settings::default();
        settings.llm.temperature = 3.0;
        assert!(settings.validate().is_err());

        settings.llm.temperature = 0.7;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_task_prefix_must_be_single_char() {
        let mut settings = Settings::default();
        settings.agent.task_prefix = "--".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_insights_window_must_be_positive() {
        let mut settings = Settings::default();
        settings.agent.insights_default_days = 0;
        assert!(settings.validate().is_err());
    }
}
