//! Typed tool parameters
//!
//! The routing stage resolves free text into one of these invocations
//! before execution. All parameters are plain strings or integers that
//! were fully parsed upstream; tools never re-interpret user text except
//! for the logging narrative, which is the extraction input by design.

use std::collections::HashMap;

use hcp_crm_core::InteractionUpdate;

/// One fully-prepared tool call.
#[derive(Debug, Clone)]
pub enum ToolInvocation {
    /// Extract a new interaction from narrative text.
    LogInteraction { raw_text: String },
    /// Apply a partial update to the record with this id.
    EditInteraction {
        interaction_id: i64,
        update: InteractionUpdate,
    },
    /// Apply a partial update to the single record matching the search.
    EditInteractionByName {
        search: String,
        update: InteractionUpdate,
    },
    /// Update one frontend form field.
    UpdateFormField { field: String, value: String },
    /// List past interactions for an HCP.
    GetInteractionHistory { search: String },
    /// Narrative analytics over the HCP's recent interactions.
    GenerateSalesInsights { search: String, period_days: i64 },
    /// Summarize the current form snapshot.
    FormInformation { form: HashMap<String, String> },
}

impl ToolInvocation {
    /// Stable operation name for logs and metrics labels.
    pub fn operation_name(&self) -> &'static str {
        match self {
            ToolInvocation::LogInteraction { .. } => "log_interaction",
            ToolInvocation::EditInteraction { .. } => "edit_interaction",
            ToolInvocation::EditInteractionByName { .. } => "edit_interaction_by_name",
            ToolInvocation::UpdateFormField { .. } => "update_form_field",
            ToolInvocation::GetInteractionHistory { .. } => "get_interaction_history",
            ToolInvocation::GenerateSalesInsights { .. } => "generate_sales_insights",
            ToolInvocation::FormInformation { .. } => "form_information",
        }
    }
}
