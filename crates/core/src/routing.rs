//! Routing decision types
//!
//! Both router strategies resolve free text to the same closed set of
//! operations with plain string parameters. The decision is ephemeral;
//! it lives for one request only.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The closed set of operations a request can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolOperation {
    /// Extract a new interaction from narrative text and populate the form.
    LogInteraction,
    /// Edit an existing record addressed by numeric/opaque id.
    EditInteraction,
    /// Edit the single record matching an HCP name search.
    EditInteractionByName,
    /// Update one frontend form field.
    UpdateFormField,
    /// List past interactions for an HCP.
    GetInteractionHistory,
    /// Narrative analytics over recent interactions.
    GenerateSalesInsights,
    /// Summarize the current form snapshot.
    FormInformation,
    /// Chat without touching any data.
    GeneralConversation,
    /// A recognized trigger whose arguments could not be parsed.
    Error,
}

impl ToolOperation {
    /// Stable name used in prompts, logs and metrics labels.
    pub fn name(&self) -> &'static str {
        match self {
            ToolOperation::LogInteraction => "log_interaction",
            ToolOperation::EditInteraction => "edit_interaction",
            ToolOperation::EditInteractionByName => "edit_interaction_by_name",
            ToolOperation::UpdateFormField => "update_form_field",
            ToolOperation::GetInteractionHistory => "get_interaction_history",
            ToolOperation::GenerateSalesInsights => "generate_sales_insights",
            ToolOperation::FormInformation => "form_information",
            ToolOperation::GeneralConversation => "general_conversation",
            ToolOperation::Error => "error",
        }
    }

    /// Look up an operation by its stable name.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "log_interaction" => ToolOperation::LogInteraction,
            "edit_interaction" => ToolOperation::EditInteraction,
            "edit_interaction_by_name" => ToolOperation::EditInteractionByName,
            "update_form_field" => ToolOperation::UpdateFormField,
            "get_interaction_history" => ToolOperation::GetInteractionHistory,
            "generate_sales_insights" => ToolOperation::GenerateSalesInsights,
            "form_information" | "form_information_tool" => ToolOperation::FormInformation,
            "general_conversation" => ToolOperation::GeneralConversation,
            "error" => ToolOperation::Error,
            _ => return None,
        })
    }
}

impl std::fmt::Display for ToolOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Router confidence in the selected operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    #[default]
    Medium,
    Low,
}

impl Confidence {
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "high" => Confidence::High,
            "low" => Confidence::Low,
            _ => Confidence::Medium,
        }
    }
}

/// The outcome of routing one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingDecision {
    /// Selected operation, always one of the closed set.
    pub operation: ToolOperation,
    /// Router confidence.
    pub confidence: Confidence,
    /// Natural-language statement of what the user wanted.
    pub intent: String,
    /// Extracted entity names to plain string values. No nesting.
    pub entities: HashMap<String, String>,
}

impl RoutingDecision {
    pub fn new(operation: ToolOperation, confidence: Confidence, intent: impl Into<String>) -> Self {
        Self {
            operation,
            confidence,
            intent: intent.into(),
            entities: HashMap::new(),
        }
    }

    pub fn with_entity(mut self, name: &str, value: impl Into<String>) -> Self {
        self.entities.insert(name.to_string(), value.into());
        self
    }

    /// Entity value, trimmed, or None when missing/blank.
    pub fn entity(&self, name: &str) -> Option<&str> {
        self.entities
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}
