//! Entity extraction from interaction narratives
//!
//! Asks the completion model for a fixed JSON schema covering all form
//! fields, then falls back to local pattern matching when the model is
//! unreachable or returns something unparseable. The extractor always
//! returns a complete map; an unresolvable HCP name is the caller's
//! distinct identification failure, not an error here.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use hcp_crm_core::CompletionModel;

use crate::json::extract_json_block;

/// Narrative prefix sent to the model. Longer input is truncated.
const PROMPT_INPUT_LIMIT: usize = 1000;

/// Fallback truncation lengths for summary and discussion points.
const SUMMARY_LIMIT: usize = 200;
const DISCUSSION_LIMIT: usize = 500;

/// Words that flag a positive interaction in the fallback path.
const POSITIVE_KEYWORDS: [&str; 4] = ["excited", "positive", "successful", "agreed"];

static RE_DR_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Dr\.?\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)").expect("valid regex")
});

/// Candidate field values extracted from one narrative.
///
/// Every key of the extraction schema is always present; absent
/// information is the empty string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityMap {
    pub hcp_name: String,
    pub interaction_type: String,
    pub interaction_date: String,
    pub interaction_time: String,
    pub attendees: String,
    pub summary: String,
    pub key_discussion_points: String,
    pub materials_shared: String,
    pub samples_distributed: String,
    pub sentiment: String,
    pub follow_up_actions: String,
}

/// Extracts structured interaction fields from free text.
pub struct EntityExtractor {
    model: Arc<dyn CompletionModel>,
}

impl EntityExtractor {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self { model }
    }

    /// Extract a complete entity map from the narrative. Never fails:
    /// a model error or malformed response drops to the local fallback.
    pub async fn extract(&self, raw_text: &str) -> EntityMap {
        let dr_names = dr_names(raw_text);

        match self.model.complete(&extraction_prompt(raw_text)).await {
            Ok(response) => match parse_response(&response) {
                Some(mut entities) => {
                    if entities.hcp_name.is_empty() {
                        if let Some(first) = dr_names.first() {
                            entities.hcp_name = format!("Dr. {}", first);
                        }
                    }
                    entities
                }
                None => {
                    tracing::warn!("extraction response was not valid JSON, using fallback");
                    fallback(raw_text, &dr_names)
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "extraction call failed, using fallback");
                fallback(raw_text, &dr_names)
            }
        }
    }
}

/// Title-cased names following a "Dr." honorific.
fn dr_names(text: &str) -> Vec<String> {
    RE_DR_NAME
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let cut: String = text.chars().take(limit).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

fn extraction_prompt(raw_text: &str) -> String {
    let snippet: String = raw_text.chars().take(PROMPT_INPUT_LIMIT).collect();
    format!(
        r#"Analyze this sales interaction text and extract information. Return ONLY a valid JSON object:

Text: "{snippet}"

{{
    "hcp_name": "Primary HCP name (e.g., Dr. Sarah Mitchell)",
    "interaction_type": "Meeting, Call, Email, Visit, or Conference",
    "interaction_date": "today",
    "interaction_time": "Extract complete time expression including periods like 'morning at 9:15', '4:10 PM', 'evening around 6', 'noon', 'midnight', etc.",
    "attendees": "Other attendees mentioned",
    "summary": "Brief 1-2 sentence summary of key outcomes",
    "key_discussion_points": "Main topics discussed",
    "materials_shared": "Materials provided",
    "samples_distributed": "Samples given",
    "sentiment": "Positive, Neutral, or Negative",
    "follow_up_actions": "Next steps mentioned"
}}

For interaction_time, capture the full time context including:
- Exact times: "9:15", "4:10 PM", "14:30"
- Time periods: "morning", "afternoon", "evening", "night"
- Combined: "morning at 9:15", "evening around 6", "late afternoon"
- Special times: "noon", "midnight", "lunch time", "dinner time"

Return only the JSON object, no explanations."#
    )
}

fn parse_response(response: &str) -> Option<EntityMap> {
    let body = extract_json_block(response)?;
    let value: Value = serde_json::from_str(&body).ok()?;
    let obj = value.as_object()?;

    let field = |key: &str| -> String {
        obj.get(key)
            .and_then(Value::as_str)
            .unwrap_or("")
            .trim()
            .to_string()
    };

    Some(EntityMap {
        hcp_name: field("hcp_name"),
        interaction_type: field("interaction_type"),
        interaction_date: field("interaction_date"),
        interaction_time: field("interaction_time"),
        attendees: field("attendees"),
        summary: field("summary"),
        key_discussion_points: field("key_discussion_points"),
        materials_shared: field("materials_shared"),
        samples_distributed: field("samples_distributed"),
        sentiment: field("sentiment"),
        follow_up_actions: field("follow_up_actions"),
    })
}

/// Local heuristic used when the model path fails.
fn fallback(raw_text: &str, dr_names: &[String]) -> EntityMap {
    let lowered = raw_text.to_lowercase();

    let hcp_name = dr_names
        .first()
        .map(|name| format!("Dr. {}", name))
        .unwrap_or_default();

    let attendees = if dr_names.len() > 1 {
        dr_names[1..]
            .iter()
            .take(2)
            .map(|name| format!("Dr. {}", name))
            .collect::<Vec<_>>()
            .join(", ")
    } else {
        String::new()
    };

    let sentiment = if POSITIVE_KEYWORDS.iter().any(|word| lowered.contains(word)) {
        "Positive"
    } else {
        "Neutral"
    };

    EntityMap {
        hcp_name,
        interaction_type: if lowered.contains("meeting") { "Meeting" } else { "Other" }.to_string(),
        interaction_date: "today".to_string(),
        interaction_time: String::new(),
        attendees,
        summary: truncate_chars(raw_text, SUMMARY_LIMIT),
        key_discussion_points: truncate_chars(raw_text, DISCUSSION_LIMIT),
        materials_shared: if lowered.contains("material") {
            "clinical materials".to_string()
        } else {
            String::new()
        },
        samples_distributed: if lowered.contains("sample") {
            "sample kits".to_string()
        } else {
            String::new()
        },
        sentiment: sentiment.to_string(),
        follow_up_actions: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use hcp_crm_core::{Error, Result};

    struct ScriptedModel {
        response: Result<String>,
    }

    #[async_trait]
    impl CompletionModel for ScriptedModel {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            match &self.response {
                Ok(text) => Ok(text.clone()),
                Err(_) => Err(Error::Completion("unreachable".to_string())),
            }
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn extractor(response: Result<String>) -> EntityExtractor {
        EntityExtractor::new(Arc::new(ScriptedModel { response }))
    }

    #[tokio::test]
    async fn test_extracts_from_fenced_json() {
        let response = "```json\n{\"hcp_name\": \"Dr. Sarah Johnson\", \"interaction_type\": \"Meeting\", \"interaction_date\": \"today\", \"interaction_time\": \"9:15\", \"sentiment\": \"Positive\"}\n```";
        let extractor = extractor(Ok(response.to_string()));

        let entities = extractor.extract("met Dr. Sarah Johnson at 9:15").await;
        assert_eq!(entities.hcp_name, "Dr. Sarah Johnson");
        assert_eq!(entities.interaction_time, "9:15");
        // Keys absent from the response are present and empty.
        assert_eq!(entities.materials_shared, "");
    }

    #[tokio::test]
    async fn test_backfills_hcp_name_from_pattern() {
        let response = r#"{"interaction_type": "Call", "sentiment": "Neutral"}"#;
        let extractor = extractor(Ok(response.to_string()));

        let entities = extractor.extract("Quick call with Dr. Patel about dosing").await;
        assert_eq!(entities.hcp_name, "Dr. Patel");
    }

    #[tokio::test]
    async fn test_fallback_on_model_error() {
        let extractor = extractor(Err(Error::Completion("down".to_string())));

        let text = "Great meeting with Dr. Sarah Johnson and Dr. Amit Patel, both excited. Shared materials and sample kits.";
        let entities = extractor.extract(text).await;

        assert_eq!(entities.hcp_name, "Dr. Sarah Johnson");
        assert_eq!(entities.attendees, "Dr. Amit Patel");
        assert_eq!(entities.interaction_type, "Meeting");
        assert_eq!(entities.sentiment, "Positive");
        assert_eq!(entities.materials_shared, "clinical materials");
        assert_eq!(entities.samples_distributed, "sample kits");
        assert_eq!(entities.interaction_date, "today");
        assert_eq!(entities.interaction_time, "");
    }

    #[tokio::test]
    async fn test_fallback_on_malformed_response() {
        let extractor = extractor(Ok("I'd be happy to help!".to_string()));

        let entities = extractor.extract("Visited the clinic, no doctors around").await;
        assert_eq!(entities.hcp_name, "");
        assert_eq!(entities.interaction_type, "Other");
        assert_eq!(entities.sentiment, "Neutral");
    }

    #[tokio::test]
    async fn test_fallback_truncates_long_text() {
        let extractor = extractor(Err(Error::Completion("down".to_string())));

        let text = "meeting ".repeat(100);
        let entities = extractor.extract(&text).await;
        assert!(entities.summary.chars().count() <= SUMMARY_LIMIT + 3);
        assert!(entities.summary.ends_with("..."));
    }
}
