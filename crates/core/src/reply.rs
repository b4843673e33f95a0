//! Typed tool replies and the pipeline response contract
//!
//! Tool execution returns a discriminated `ToolReply` instead of marker
//! characters embedded in free text. Only the response composer turns a
//! reply into user-facing wording.

use serde::{Deserialize, Serialize};
use crate::fields::FieldUpdate;

/// Compact record summary used in disambiguation listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSummary {
    pub id: i64,
    pub hcp_name: String,
    pub date: String,
    pub time: String,
}

/// The typed result of executing one operation.
#[derive(Debug, Clone)]
pub enum ToolReply {
    /// Log flow succeeded: hand the extracted fields to the form.
    FormPopulate {
        field_updates: Vec<FieldUpdate>,
        message: String,
    },
    /// One form field resolved and normalized.
    FormUpdate { update: FieldUpdate, message: String },
    /// A record mutation succeeded.
    Updated { detail: String },
    /// Read query succeeded; `body` is the formatted listing or narrative.
    Report { body: String },
    /// Name search matched nothing.
    NotFound { message: String },
    /// Name search matched several records; mutation was aborted.
    Ambiguous {
        search: String,
        matches: Vec<MatchSummary>,
    },
    /// Plain conversational text, passed through verbatim.
    Conversation { message: String },
    /// The operation failed; `message` is already user-actionable.
    Failed { message: String },
}

impl ToolReply {
    pub fn failed(message: impl Into<String>) -> Self {
        ToolReply::Failed {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ToolReply::NotFound {
            message: message.into(),
        }
    }
}

/// The response contract exposed to the HTTP layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "response_type")]
pub enum AgentResponse {
    /// Structured form population payload; must stay machine-parseable.
    #[serde(rename = "FORM_POPULATE")]
    FormPopulate {
        field_updates: Vec<FieldUpdate>,
        message: String,
    },
    /// Structured single-field update payload.
    #[serde(rename = "FORM_UPDATE")]
    FormUpdate {
        field: String,
        value: String,
        message: String,
    },
    /// Plain text message.
    #[serde(rename = "MESSAGE")]
    Message { message: String },
}

impl AgentResponse {
    pub fn message(text: impl Into<String>) -> Self {
        AgentResponse::Message {
            message: text.into(),
        }
    }

    /// The user-visible text regardless of variant.
    pub fn text(&self) -> &str {
        match self {
            AgentResponse::FormPopulate { message, .. } => message,
            AgentResponse::FormUpdate { message, .. } => message,
            AgentResponse::Message { message } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FormField;

    #[test]
    fn test_form_update_serialization() {
        let response = AgentResponse::FormUpdate {
            field: FormField::HcpSentiment.as_str().to_string(),
            value: "Positive".to_string(),
            message: "Updated sentiment to 'Positive'".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["response_type"], "FORM_UPDATE");
        assert_eq!(json["field"], "hcpSentiment");
        assert_eq!(json["value"], "Positive");
    }

    #[test]
    fn test_form_populate_serialization() {
        let response = AgentResponse::FormPopulate {
            field_updates: vec![FieldUpdate::new(FormField::HcpName, "Dr. Sarah Johnson")],
            message: "populated".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["response_type"], "FORM_POPULATE");
        assert_eq!(json["field_updates"][0]["field"], "hcpName");
    }
}
