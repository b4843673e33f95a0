//! Application State
//!
//! Shared state across all handlers. Everything is constructed once at
//! startup and injected; handlers only read.

use std::sync::Arc;
use std::time::Duration;

use hcp_crm_agent::{
    Agent, AgentOptions, CommandRouter, ConversationHandler, DeterministicRouter, SemanticRouter,
};
use hcp_crm_config::{RouterMode, Settings};
use hcp_crm_core::{CompletionModel, InteractionStore};
use hcp_crm_llm::{CompletionBackend, CompletionConfig, LlmError};
use hcp_crm_storage::InMemoryStore;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub agent: Arc<Agent>,
    pub store: Arc<InMemoryStore>,
}

impl AppState {
    /// Wire the full assistant from settings.
    pub fn from_settings(settings: Settings) -> Result<Self, LlmError> {
        let store = Arc::new(InMemoryStore::new());
        let model: Arc<dyn CompletionModel> =
            Arc::new(CompletionBackend::new(completion_config(&settings))?);

        let (router, conversation): (Arc<dyn CommandRouter>, ConversationHandler) =
            match settings.agent.router_mode {
                RouterMode::Simple => (
                    Arc::new(DeterministicRouter::new(settings.agent.prefix_char())),
                    ConversationHandler::canned(),
                ),
                RouterMode::Intelligent => (
                    Arc::new(SemanticRouter::new(model.clone())),
                    ConversationHandler::with_model(model.clone()),
                ),
            };

        let agent = Agent::new(
            router,
            store.clone() as Arc<dyn InteractionStore>,
            model,
            conversation,
            AgentOptions {
                insights_default_days: settings.agent.insights_default_days,
            },
        );

        Ok(Self {
            settings: Arc::new(settings),
            agent: Arc::new(agent),
            store,
        })
    }
}

fn completion_config(settings: &Settings) -> CompletionConfig {
    CompletionConfig {
        model: settings.llm.model.clone(),
        endpoint: settings.llm.endpoint.clone(),
        api_key: settings.llm.api_key.clone(),
        temperature: settings.llm.temperature,
        max_tokens: settings.llm.max_tokens as usize,
        timeout: Duration::from_secs(settings.llm.timeout_seconds),
        max_retries: settings.llm.max_retries,
    }
}
