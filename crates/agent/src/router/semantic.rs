//! Model-backed semantic router
//!
//! Sends the user text plus an operation catalogue to the completion
//! model and expects a JSON verdict. When the model is unreachable or
//! the verdict is unusable, a keyword fallback keeps routing total:
//! every input resolves to some operation, worst case a low-confidence
//! logging attempt.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use hcp_crm_core::{CompletionModel, Confidence, RoutingDecision, ToolOperation};
use hcp_crm_nlp::extract_json_block;

use crate::router::{entity, CommandRouter};
use crate::updates::parse_field_assignment;

/// Keyword families for the fallback path, checked in order.
const NEW_INTERACTION_VERBS: [&str; 5] = [
    "met with",
    "had a call",
    "visited",
    "spoke with",
    "discussed with",
];
const MODIFICATION_VERBS: [&str; 6] = ["edit", "update", "change", "modify", "correct", "fix"];
const HISTORY_NOUNS: [&str; 4] = ["history", "interactions with", "past interactions", "previous interactions"];
const ANALYSIS_NOUNS: [&str; 5] = ["insight", "analysis", "analyze", "performance", "trend"];
const QUESTION_OPENERS: [&str; 6] = ["what", "who", "how", "why", "can you", "hello"];

pub struct SemanticRouter {
    model: Arc<dyn CompletionModel>,
}

impl SemanticRouter {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl CommandRouter for SemanticRouter {
    async fn route(&self, text: &str) -> RoutingDecision {
        // A task prefix is meaningful to the pattern router only.
        let text = text.trim().trim_start_matches('-').trim();

        match self.model.complete(&routing_prompt(text)).await {
            Ok(response) => match parse_verdict(&response, text) {
                Some(decision) => {
                    tracing::debug!(
                        operation = %decision.operation,
                        confidence = ?decision.confidence,
                        "semantic routing"
                    );
                    decision
                }
                None => {
                    tracing::warn!("routing verdict was not usable, using keyword fallback");
                    keyword_fallback(text)
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "routing call failed, using keyword fallback");
                keyword_fallback(text)
            }
        }
    }
}

fn routing_prompt(text: &str) -> String {
    format!(
        r#"You are an intent router for a pharma CRM assistant. Select exactly one tool for the user's message and return ONLY a valid JSON object.

Available tools:
- log_interaction: user describes a new interaction with an HCP ("I met with Dr. Chen this morning about the diabetes trial")
- edit_interaction: user references a stored interaction by numeric ID ("edit interaction 3, change the sentiment to positive")
- edit_interaction_by_name: user wants to change a stored interaction identified by HCP name ("update my last meeting with Dr. Singh, the time was actually 2:30")
- update_form_field: user adjusts one field of the form being filled ("put the sentiment as positive", "actually the time was 9:15")
- get_interaction_history: user asks what happened with an HCP before ("what interactions have I had with Dr. Johnson?")
- generate_sales_insights: user asks for analysis, trends or recommendations ("how is my engagement with Dr. Patel trending?")
- form_information: user asks what is currently in the form ("what's in the form so far?")
- general_conversation: greetings, thanks, questions about your capabilities

User message: "{text}"

{{
    "user_intent": "one sentence describing what the user wants",
    "reasoning": "why this tool fits",
    "selected_tool": "one of the tool names above",
    "confidence": "high, medium, or low",
    "extracted_entities": {{
        "hcp_name": "HCP name if mentioned",
        "interaction_id": "numeric ID if mentioned",
        "field": "form field name for update_form_field",
        "value": "new value for update_form_field",
        "changes": "requested changes for edit tools",
        "period_days": "analysis window in days if mentioned"
    }}
}}

Omit entity keys that do not apply. Return only the JSON object, no explanations."#
    )
}

fn parse_verdict(response: &str, text: &str) -> Option<RoutingDecision> {
    let body = extract_json_block(response)?;
    let value: Value = serde_json::from_str(&body).ok()?;
    let obj = value.as_object()?;

    let operation = obj
        .get("selected_tool")
        .and_then(Value::as_str)
        .and_then(ToolOperation::from_name)?;
    let confidence = obj
        .get("confidence")
        .and_then(Value::as_str)
        .map(Confidence::from_str_loose)
        .unwrap_or_default();
    let intent = obj
        .get("user_intent")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();

    let mut decision = RoutingDecision::new(operation, confidence, intent);
    if let Some(entities) = obj.get("extracted_entities").and_then(Value::as_object) {
        for (key, value) in entities {
            // Numbers are accepted where the model ignores the
            // strings-only instruction.
            let text_value = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                _ => continue,
            };
            decision = decision.with_entity(key, text_value);
        }
    }
    if operation == ToolOperation::LogInteraction {
        decision = decision.with_entity(entity::RAW_TEXT, text);
    }
    Some(decision)
}

/// Keyword routing used when the model path fails.
fn keyword_fallback(text: &str) -> RoutingDecision {
    let lowered = text.to_lowercase();
    let contains_any = |family: &[&str]| family.iter().any(|kw| lowered.contains(kw));

    if contains_any(&NEW_INTERACTION_VERBS) {
        return RoutingDecision::new(
            ToolOperation::LogInteraction,
            Confidence::Medium,
            "describes a new interaction",
        )
        .with_entity(entity::RAW_TEXT, text);
    }
    if contains_any(&MODIFICATION_VERBS) {
        if let Some((field, value)) = parse_field_assignment(text) {
            return RoutingDecision::new(
                ToolOperation::UpdateFormField,
                Confidence::Medium,
                "adjusts a form field",
            )
            .with_entity(entity::FIELD, field)
            .with_entity(entity::VALUE, value);
        }
        return RoutingDecision::new(
            ToolOperation::EditInteractionByName,
            Confidence::Low,
            "wants to modify a stored interaction",
        )
        .with_entity(entity::CHANGES, text);
    }
    if contains_any(&HISTORY_NOUNS) {
        return RoutingDecision::new(
            ToolOperation::GetInteractionHistory,
            Confidence::Medium,
            "asks about past interactions",
        );
    }
    if contains_any(&ANALYSIS_NOUNS) {
        return RoutingDecision::new(
            ToolOperation::GenerateSalesInsights,
            Confidence::Medium,
            "asks for analysis",
        );
    }
    if QUESTION_OPENERS.iter().any(|kw| lowered.starts_with(kw)) {
        return RoutingDecision::new(
            ToolOperation::GeneralConversation,
            Confidence::Medium,
            "conversational question",
        );
    }

    RoutingDecision::new(
        ToolOperation::LogInteraction,
        Confidence::Low,
        "unclassified, treated as a logging attempt",
    )
    .with_entity(entity::RAW_TEXT, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcp_crm_core::{Error, Result};

    struct ScriptedModel(Result<String>);

    #[async_trait]
    impl CompletionModel for ScriptedModel {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            match &self.0 {
                Ok(text) => Ok(text.clone()),
                Err(_) => Err(Error::Completion("down".to_string())),
            }
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn router(response: Result<String>) -> SemanticRouter {
        SemanticRouter::new(Arc::new(ScriptedModel(response)))
    }

    #[tokio::test]
    async fn test_verdict_is_parsed() {
        let verdict = r#"{"user_intent": "see history", "selected_tool": "get_interaction_history", "confidence": "high", "extracted_entities": {"hcp_name": "Dr. Johnson"}}"#;
        let decision = router(Ok(verdict.to_string()))
            .route("what happened with Dr. Johnson?")
            .await;

        assert_eq!(decision.operation, ToolOperation::GetInteractionHistory);
        assert_eq!(decision.confidence, Confidence::High);
        assert_eq!(decision.entity(entity::HCP_NAME), Some("Dr. Johnson"));
    }

    #[tokio::test]
    async fn test_numeric_entity_is_accepted() {
        let verdict = r#"{"selected_tool": "edit_interaction", "confidence": "high", "extracted_entities": {"interaction_id": 3, "changes": "sentiment to positive"}}"#;
        let decision = router(Ok(verdict.to_string())).route("fix interaction 3").await;

        assert_eq!(decision.operation, ToolOperation::EditInteraction);
        assert_eq!(decision.entity(entity::INTERACTION_ID), Some("3"));
    }

    #[tokio::test]
    async fn test_unknown_tool_falls_back_to_keywords() {
        let verdict = r#"{"selected_tool": "delete_everything", "confidence": "high"}"#;
        let decision = router(Ok(verdict.to_string()))
            .route("I met with Dr. Chen yesterday")
            .await;

        assert_eq!(decision.operation, ToolOperation::LogInteraction);
    }

    #[tokio::test]
    async fn test_model_failure_uses_keyword_fallback() {
        let decision = router(Err(Error::Completion("down".to_string())))
            .route("show me the history for Dr. Patel")
            .await;

        assert_eq!(decision.operation, ToolOperation::GetInteractionHistory);
    }

    #[tokio::test]
    async fn test_greeting_falls_back_to_conversation() {
        let decision = router(Err(Error::Completion("down".to_string())))
            .route("hello there")
            .await;

        assert_eq!(decision.operation, ToolOperation::GeneralConversation);
    }
}
