//! Deterministic pattern router
//!
//! Task commands are marked with a prefix character (default '-');
//! unmarked text is small talk and routes to general conversation.
//! Marked text runs through an ordered cascade of pattern groups, and
//! anything that matches no group is treated as a logging narrative.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use hcp_crm_core::{Confidence, RoutingDecision, ToolOperation};

use crate::router::{entity, CommandRouter};
use crate::updates::parse_field_assignment;

static RE_EDIT_BY_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:edit|update|modify|change)\s+(?:the\s+)?interaction\s+(?:id\s+)?#?(\d+)\b[\s,:]*(.*)$")
        .expect("valid regex")
});

static RE_EDIT_BY_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:edit|update|modify|change)\s+(?:the\s+)?(?:latest\s+|last\s+|recent\s+)?interaction\s+(?:with|for|of)\s+(.+)$")
        .expect("valid regex")
});

/// First change verb inside an edit remainder separates the HCP name
/// from the change clauses.
static RE_CHANGE_VERB: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[\s,:]*\b(change|set|update|make|put)\b").expect("valid regex")
});

static HISTORY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^(?:show|get|give|view|list|display)\s+(?:me\s+)?(?:the\s+)?(?:interaction\s+)?history\s+(?:for|of|with)\s+(.+)$",
        r"(?i)^(?:interaction\s+)?history\s+(?:for|of|with)\s+(.+)$",
        r"(?i)^history\s+(.+)$",
        r"(?i)^(?:past|previous|recent)\s+interactions?\s+(?:with|for|of)\s+(.+)$",
        r"(?i)^what\s+interactions?\s+(?:have\s+i\s+had|do\s+i\s+have)\s+with\s+(.+?)\??$",
        r"(?i)^(?:show|list)\s+(?:me\s+)?(?:all\s+)?interactions?\s+(?:with|for)\s+(.+)$",
        r"(?i)^interactions?\s+(?:with|for)\s+(.+)$",
        // Last resort: "Dr. Smith history".
        r"(?i)^(.+?)\s+history$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Leading verbs and phrases that announce an insights request. A bare
/// keyword in the middle of a logging narrative ("reviewed the drug
/// performance data") must not trigger this branch.
const INSIGHTS_STARTERS: [&str; 7] = [
    "insights",
    "insight",
    "analyze",
    "analyse",
    "generate insights",
    "generate sales",
    "sales report",
];
const INSIGHTS_PHRASES: [&str; 5] = [
    "generate insights",
    "analyze pipeline",
    "analyse pipeline",
    "sales analysis",
    "pipeline analysis",
];

static RE_INSIGHTS_TARGET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:for|about|on)\s+(.+?)(?:\s+(?:over|in)?\s*(?:the\s+)?(?:last|past)\s+(\d+)\s+days?)?\s*$")
        .expect("valid regex")
});

static RE_BARE_PERIOD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:last|past)\s+(\d+)\s+days?\b").expect("valid regex"));

/// Stored-record reference: "interaction 3", "interaction with Singh".
/// Distinguishes record edits from the "interaction type" form field.
static RE_STORED_INTERACTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\binteractions?\s+(?:(?:id\s+)?#?\d|with\b|for\b|of\b)").expect("valid regex")
});

/// An edit command that names a stored interaction but fits neither the
/// id nor the name pattern.
static RE_EDIT_TRIGGER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:edit|update|modify|change)\s+(?:the\s+)?(?:latest\s+|last\s+|recent\s+)?interactions?\b")
        .expect("valid regex")
});

const PUT_USAGE: &str =
    "I couldn't parse that form update. Use: 'put [field] as [value]', e.g. 'put sentiment as positive'.";
const EDIT_USAGE: &str =
    "Invalid edit format. Use: 'edit interaction [id]' or 'edit interaction with [name]', followed by the changes.";

static RE_FORM_INFO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:what(?:'s|\s+is)\s+(?:in|on)\s+the\s+form|form\s+(?:info|information|status|contents?)|show\s+(?:me\s+)?the\s+form)\??$")
        .expect("valid regex")
});

/// Prefix-gated pattern cascade.
pub struct DeterministicRouter {
    task_prefix: char,
}

impl DeterministicRouter {
    pub fn new(task_prefix: char) -> Self {
        Self { task_prefix }
    }

    fn route_marked(&self, text: &str) -> RoutingDecision {
        if let Some(decision) = route_form_update(text) {
            return decision;
        }
        if let Some(decision) = route_edit(text) {
            return decision;
        }
        if let Some(decision) = route_history(text) {
            return decision;
        }
        if let Some(decision) = route_insights(text) {
            return decision;
        }
        if RE_FORM_INFO.is_match(text) {
            return RoutingDecision::new(
                ToolOperation::FormInformation,
                Confidence::High,
                "user asked about the current form",
            );
        }

        // Anything else marked as a task is a logging narrative.
        RoutingDecision::new(
            ToolOperation::LogInteraction,
            Confidence::Medium,
            "log a new interaction",
        )
        .with_entity(entity::RAW_TEXT, text)
    }
}

#[async_trait]
impl CommandRouter for DeterministicRouter {
    async fn route(&self, text: &str) -> RoutingDecision {
        let trimmed = text.trim();
        match trimmed.strip_prefix(self.task_prefix) {
            Some(marked) => {
                let decision = self.route_marked(marked.trim());
                tracing::debug!(operation = %decision.operation, "pattern routing");
                decision
            }
            None => RoutingDecision::new(
                ToolOperation::GeneralConversation,
                Confidence::High,
                "unmarked input, conversational",
            ),
        }
    }
}

/// "put sentiment as happy", "change the date to yesterday" style
/// commands adjust the form, not a stored record. "put interaction
/// type as call" belongs here too; only a stored-record reference
/// defers to the edit branch.
fn route_form_update(text: &str) -> Option<RoutingDecision> {
    let lowered = text.to_lowercase();
    let starts_with_verb = ["put ", "set ", "change ", "update ", "make "]
        .iter()
        .any(|v| lowered.starts_with(v));
    if !starts_with_verb || RE_STORED_INTERACTION.is_match(&lowered) {
        return None;
    }

    match parse_field_assignment(text) {
        Some((field, value)) => Some(
            RoutingDecision::new(
                ToolOperation::UpdateFormField,
                Confidence::High,
                "update a form field",
            )
            .with_entity(entity::FIELD, field)
            .with_entity(entity::VALUE, value),
        ),
        // A "put" with no parseable assignment is a malformed form
        // command, not a logging narrative.
        None if lowered.starts_with("put ") => Some(usage_error(PUT_USAGE)),
        None => None,
    }
}

fn route_edit(text: &str) -> Option<RoutingDecision> {
    if let Some(caps) = RE_EDIT_BY_ID.captures(text) {
        return Some(
            RoutingDecision::new(
                ToolOperation::EditInteraction,
                Confidence::High,
                "edit a stored interaction by id",
            )
            .with_entity(entity::INTERACTION_ID, &caps[1])
            .with_entity(entity::CHANGES, &caps[2]),
        );
    }

    if let Some(caps) = RE_EDIT_BY_NAME.captures(text) {
        let remainder = caps[1].trim();
        let (name, changes) = match RE_CHANGE_VERB.find(remainder) {
            Some(m) if m.start() > 0 => (
                remainder[..m.start()].trim(),
                remainder[m.start()..].trim(),
            ),
            _ => (remainder, ""),
        };

        return Some(
            RoutingDecision::new(
                ToolOperation::EditInteractionByName,
                Confidence::High,
                "edit a stored interaction by HCP name",
            )
            .with_entity(entity::HCP_NAME, name)
            .with_entity(entity::CHANGES, changes),
        );
    }

    if RE_EDIT_TRIGGER.is_match(text) {
        return Some(usage_error(EDIT_USAGE));
    }
    None
}

fn usage_error(message: &str) -> RoutingDecision {
    RoutingDecision::new(
        ToolOperation::Error,
        Confidence::High,
        "malformed command",
    )
    .with_entity(entity::USAGE, message)
}

fn route_history(text: &str) -> Option<RoutingDecision> {
    for pattern in HISTORY_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            return Some(
                RoutingDecision::new(
                    ToolOperation::GetInteractionHistory,
                    Confidence::High,
                    "list interaction history",
                )
                .with_entity(entity::HCP_NAME, caps[1].trim()),
            );
        }
    }
    // A history request with no parseable name still routes; the tool
    // asks for the HCP.
    if text.to_lowercase().contains("history") {
        return Some(RoutingDecision::new(
            ToolOperation::GetInteractionHistory,
            Confidence::Medium,
            "list interaction history",
        ));
    }
    None
}

fn route_insights(text: &str) -> Option<RoutingDecision> {
    let lowered = text.to_lowercase();
    let triggered = INSIGHTS_STARTERS.iter().any(|s| lowered.starts_with(s))
        || INSIGHTS_PHRASES.iter().any(|p| lowered.contains(p));
    if !triggered {
        return None;
    }

    let mut decision = RoutingDecision::new(
        ToolOperation::GenerateSalesInsights,
        Confidence::High,
        "generate sales insights",
    );
    if let Some(caps) = RE_INSIGHTS_TARGET.captures(text) {
        decision = decision.with_entity(entity::HCP_NAME, caps[1].trim());
        if let Some(days) = caps.get(2) {
            decision = decision.with_entity(entity::PERIOD_DAYS, days.as_str());
        }
    } else if let Some(caps) = RE_BARE_PERIOD.captures(text) {
        // No HCP named: the tool analyzes the whole pipeline over the
        // stated window.
        decision = decision.with_entity(entity::PERIOD_DAYS, &caps[1]);
    }
    Some(decision)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> DeterministicRouter {
        DeterministicRouter::new('-')
    }

    async fn route(text: &str) -> RoutingDecision {
        router().route(text).await
    }

    #[tokio::test]
    async fn test_unmarked_text_is_conversation() {
        let decision = route("Hello, how are you?").await;
        assert_eq!(decision.operation, ToolOperation::GeneralConversation);
    }

    #[tokio::test]
    async fn test_marked_narrative_defaults_to_logging() {
        let decision = route("-I met with Dr. Sarah Johnson today at 9:15 about cardiology").await;
        assert_eq!(decision.operation, ToolOperation::LogInteraction);
        assert!(decision.entity(entity::RAW_TEXT).unwrap().contains("Dr. Sarah Johnson"));
    }

    #[tokio::test]
    async fn test_form_field_assignment() {
        let decision = route("-put sentiment as happy").await;
        assert_eq!(decision.operation, ToolOperation::UpdateFormField);
        assert_eq!(decision.entity(entity::FIELD), Some("sentiment"));
        assert_eq!(decision.entity(entity::VALUE), Some("happy"));
    }

    #[tokio::test]
    async fn test_edit_by_id_with_changes() {
        let decision = route("-edit interaction 3 change sentiment to positive").await;
        assert_eq!(decision.operation, ToolOperation::EditInteraction);
        assert_eq!(decision.entity(entity::INTERACTION_ID), Some("3"));
        assert_eq!(
            decision.entity(entity::CHANGES),
            Some("change sentiment to positive")
        );
    }

    #[tokio::test]
    async fn test_edit_by_name_splits_name_from_changes() {
        let decision = route("-edit interaction with Singh change sentiment to positive").await;
        assert_eq!(decision.operation, ToolOperation::EditInteractionByName);
        assert_eq!(decision.entity(entity::HCP_NAME), Some("Singh"));
        assert_eq!(
            decision.entity(entity::CHANGES),
            Some("change sentiment to positive")
        );
    }

    #[tokio::test]
    async fn test_history_patterns() {
        for text in [
            "-history for Dr. Johnson",
            "-show me the history for Dr. Johnson",
            "-past interactions with Dr. Johnson",
            "-what interactions have I had with Dr. Johnson?",
        ] {
            let decision = route(text).await;
            assert_eq!(
                decision.operation,
                ToolOperation::GetInteractionHistory,
                "{text}"
            );
            assert_eq!(decision.entity(entity::HCP_NAME), Some("Dr. Johnson"), "{text}");
        }
    }

    #[tokio::test]
    async fn test_interaction_type_is_a_form_field() {
        let decision = route("-put interaction type as call").await;
        assert_eq!(decision.operation, ToolOperation::UpdateFormField);
        assert_eq!(decision.entity(entity::FIELD), Some("interaction type"));
        assert_eq!(decision.entity(entity::VALUE), Some("call"));
    }

    #[tokio::test]
    async fn test_malformed_put_reports_usage() {
        let decision = route("-put sentiment happy").await;
        assert_eq!(decision.operation, ToolOperation::Error);
        assert!(decision
            .entity(entity::USAGE)
            .unwrap()
            .contains("put [field] as [value]"));
    }

    #[tokio::test]
    async fn test_malformed_edit_reports_usage() {
        for text in ["-edit interaction", "-edit interaction sentiment positive"] {
            let decision = route(text).await;
            assert_eq!(decision.operation, ToolOperation::Error, "{text}");
            assert!(
                decision
                    .entity(entity::USAGE)
                    .unwrap()
                    .contains("edit interaction [id]"),
                "{text}"
            );
        }
    }

    #[tokio::test]
    async fn test_generic_history_pattern() {
        let decision = route("-Dr. Smith history").await;
        assert_eq!(decision.operation, ToolOperation::GetInteractionHistory);
        assert_eq!(decision.entity(entity::HCP_NAME), Some("Dr. Smith"));
    }

    #[tokio::test]
    async fn test_insights_with_period() {
        let decision = route("-insights for Dr. Patel last 60 days").await;
        assert_eq!(decision.operation, ToolOperation::GenerateSalesInsights);
        assert_eq!(decision.entity(entity::HCP_NAME), Some("Dr. Patel"));
        assert_eq!(decision.entity(entity::PERIOD_DAYS), Some("60"));
    }

    #[tokio::test]
    async fn test_whole_pipeline_insights_with_bare_period() {
        let decision = route("-analyze pipeline last 60 days").await;
        assert_eq!(decision.operation, ToolOperation::GenerateSalesInsights);
        assert_eq!(decision.entity(entity::HCP_NAME), None);
        assert_eq!(decision.entity(entity::PERIOD_DAYS), Some("60"));
    }

    #[tokio::test]
    async fn test_insights_keyword_inside_narrative_still_logs() {
        let decision =
            route("-met with Dr. Chen today to review the drug performance data").await;
        assert_eq!(decision.operation, ToolOperation::LogInteraction);
    }

    #[tokio::test]
    async fn test_form_information() {
        let decision = route("-what's in the form?").await;
        assert_eq!(decision.operation, ToolOperation::FormInformation);
    }
}
