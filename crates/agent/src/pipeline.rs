//! Request pipeline
//!
//! One user message flows through fixed stages: received, analyzed
//! (routing), routed (invocation preparation), executed (tool run) and
//! composed (final response). Errors are absorbed at the stage where
//! they occur and turned into a user-actionable message; the pipeline
//! itself never returns an error to the HTTP layer.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use hcp_crm_core::{
    AgentResponse, CompletionModel, InteractionStore, RoutingDecision, ToolOperation,
};
use hcp_crm_tools::{ToolInvocation, ToolRegistry};

use crate::compose::compose;
use crate::conversation::ConversationHandler;
use crate::router::{entity, CommandRouter};
use crate::updates::{parse_field_assignment, parse_record_changes};

const EMPTY_INPUT: &str = "I didn't catch that. Tell me about an HCP interaction, or say 'help'.";

#[derive(Debug, Clone)]
pub struct AgentOptions {
    /// Default analysis window for insights when the user names none.
    pub insights_default_days: i64,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            insights_default_days: 30,
        }
    }
}

/// The assistant core: routing, tool execution and composition.
pub struct Agent {
    router: Arc<dyn CommandRouter>,
    registry: ToolRegistry,
    conversation: ConversationHandler,
    options: AgentOptions,
}

impl Agent {
    pub fn new(
        router: Arc<dyn CommandRouter>,
        store: Arc<dyn InteractionStore>,
        model: Arc<dyn CompletionModel>,
        conversation: ConversationHandler,
        options: AgentOptions,
    ) -> Self {
        Self {
            router,
            registry: ToolRegistry::new(store, model),
            conversation,
            options,
        }
    }

    /// Handle one user message against the current form snapshot.
    pub async fn handle(
        &self,
        user_text: &str,
        form: HashMap<String, String>,
    ) -> AgentResponse {
        let request_id = Uuid::new_v4();
        let started = Instant::now();
        let span = tracing::info_span!("request", %request_id);
        let _guard = span.enter();

        let text = user_text.trim();
        if text.is_empty() {
            return AgentResponse::message(EMPTY_INPUT);
        }
        tracing::debug!(stage = "received", chars = text.len());

        let decision = self.router.route(text).await;
        tracing::info!(
            stage = "routed",
            operation = %decision.operation,
            confidence = ?decision.confidence
        );

        let response = match decision.operation {
            ToolOperation::GeneralConversation => {
                AgentResponse::message(self.conversation.respond(text).await)
            }
            ToolOperation::Error => AgentResponse::message(parse_failure_message(&decision)),
            _ => match self.prepare(&decision, &form, text) {
                Ok(invocation) => {
                    let reply = self.registry.execute(invocation).await;
                    tracing::debug!(stage = "executed");
                    compose(&decision, reply)
                }
                Err(message) => AgentResponse::message(message),
            },
        };

        tracing::info!(
            stage = "composed",
            elapsed_ms = started.elapsed().as_millis() as u64
        );
        response
    }

    /// Turn a routing decision into a fully typed invocation.
    fn prepare(
        &self,
        decision: &RoutingDecision,
        form: &HashMap<String, String>,
        text: &str,
    ) -> Result<ToolInvocation, String> {
        Ok(match decision.operation {
            ToolOperation::LogInteraction => ToolInvocation::LogInteraction {
                raw_text: decision
                    .entity(entity::RAW_TEXT)
                    .unwrap_or(text)
                    .to_string(),
            },
            ToolOperation::EditInteraction => {
                let interaction_id = decision
                    .entity(entity::INTERACTION_ID)
                    .and_then(|id| id.parse::<i64>().ok())
                    .ok_or_else(|| {
                        "I couldn't read the interaction ID. Try 'edit interaction 3 change sentiment to positive'.".to_string()
                    })?;
                ToolInvocation::EditInteraction {
                    interaction_id,
                    update: parse_record_changes(decision.entity(entity::CHANGES).unwrap_or("")),
                }
            }
            ToolOperation::EditInteractionByName => ToolInvocation::EditInteractionByName {
                search: decision.entity(entity::HCP_NAME).unwrap_or("").to_string(),
                update: parse_record_changes(decision.entity(entity::CHANGES).unwrap_or("")),
            },
            ToolOperation::UpdateFormField => {
                let pair = match (decision.entity(entity::FIELD), decision.entity(entity::VALUE)) {
                    (Some(field), Some(value)) => Some((field.to_string(), value.to_string())),
                    _ => parse_field_assignment(text),
                };
                let (field, value) = pair.ok_or_else(|| {
                    "I couldn't tell which field to change. Try 'put sentiment as positive'.".to_string()
                })?;
                ToolInvocation::UpdateFormField { field, value }
            }
            ToolOperation::GetInteractionHistory => ToolInvocation::GetInteractionHistory {
                search: decision.entity(entity::HCP_NAME).unwrap_or("").to_string(),
            },
            ToolOperation::GenerateSalesInsights => ToolInvocation::GenerateSalesInsights {
                search: decision.entity(entity::HCP_NAME).unwrap_or("").to_string(),
                period_days: decision
                    .entity(entity::PERIOD_DAYS)
                    .and_then(|d| d.parse::<i64>().ok())
                    .unwrap_or(self.options.insights_default_days),
            },
            ToolOperation::FormInformation => ToolInvocation::FormInformation {
                form: form.clone(),
            },
            // Handled before prepare.
            ToolOperation::GeneralConversation | ToolOperation::Error => {
                return Err(EMPTY_INPUT.to_string())
            }
        })
    }
}

fn parse_failure_message(decision: &RoutingDecision) -> String {
    if let Some(usage) = decision.entity(entity::USAGE) {
        return usage.to_string();
    }
    if decision.intent.is_empty() {
        "I recognized a command but couldn't work out its details. Could you rephrase it?".to_string()
    } else {
        format!(
            "I recognized a command ({}) but couldn't work out its details. Could you rephrase it?",
            decision.intent
        )
    }
}
