//! Tool registry
//!
//! Single entry point for executing a prepared invocation. Failures are
//! returned as `ToolReply::Failed` with user-actionable wording; the
//! registry never panics and never leaks internal error detail upstream.

use std::sync::Arc;

use hcp_crm_core::{CompletionModel, InteractionStore, ToolReply};
use hcp_crm_nlp::EntityExtractor;

use crate::invocation::ToolInvocation;
use crate::{edit, form, history, insights, log};

pub struct ToolRegistry {
    store: Arc<dyn InteractionStore>,
    model: Arc<dyn CompletionModel>,
    extractor: EntityExtractor,
}

impl ToolRegistry {
    pub fn new(store: Arc<dyn InteractionStore>, model: Arc<dyn CompletionModel>) -> Self {
        let extractor = EntityExtractor::new(model.clone());
        Self {
            store,
            model,
            extractor,
        }
    }

    /// Execute one invocation to completion.
    pub async fn execute(&self, invocation: ToolInvocation) -> ToolReply {
        let operation = invocation.operation_name();
        tracing::debug!(operation, "executing tool");

        let reply = match invocation {
            ToolInvocation::LogInteraction { raw_text } => {
                log::log_interaction(&self.extractor, &raw_text).await
            }
            ToolInvocation::EditInteraction {
                interaction_id,
                update,
            } => edit::edit_interaction(&self.store, interaction_id, update).await,
            ToolInvocation::EditInteractionByName { search, update } => {
                edit::edit_interaction_by_name(&self.store, &search, update).await
            }
            ToolInvocation::UpdateFormField { field, value } => {
                form::update_form_field(&field, &value)
            }
            ToolInvocation::GetInteractionHistory { search } => {
                history::get_interaction_history(&self.store, &search).await
            }
            ToolInvocation::GenerateSalesInsights {
                search,
                period_days,
            } => {
                insights::generate_sales_insights(&self.store, &self.model, &search, period_days)
                    .await
            }
            ToolInvocation::FormInformation { form } => form::form_information(&form),
        };

        if let ToolReply::Failed { message } = &reply {
            tracing::info!(operation, message, "tool reported failure");
        }
        reply
    }
}
