//! Response composition
//!
//! The single place where a typed tool reply becomes user-facing text.
//! Structured payloads (form population, field updates) pass through as
//! structured responses; everything else becomes a plain message. Low
//! router confidence earns a hedge on plain messages so the user can
//! correct a misrouted request.

use hcp_crm_core::{AgentResponse, Confidence, MatchSummary, RoutingDecision, ToolReply};

const LOW_CONFIDENCE_HEDGE: &str =
    " (I'm not entirely sure about this interpretation - please let me know if this isn't what you wanted)";

pub fn compose(decision: &RoutingDecision, reply: ToolReply) -> AgentResponse {
    let hedge = decision.confidence == Confidence::Low;

    match reply {
        ToolReply::FormPopulate {
            field_updates,
            message,
        } => AgentResponse::FormPopulate {
            field_updates,
            message,
        },
        ToolReply::FormUpdate { update, message } => AgentResponse::FormUpdate {
            field: update.field,
            value: update.value,
            message,
        },
        ToolReply::Updated { detail } => plain(detail, hedge),
        ToolReply::Report { body } => plain(body, hedge),
        ToolReply::NotFound { message } => plain(message, hedge),
        ToolReply::Ambiguous { search, matches } => plain(ambiguity_listing(&search, &matches), hedge),
        // Conversation replies are already final wording.
        ToolReply::Conversation { message } => AgentResponse::message(message),
        ToolReply::Failed { message } => plain(message, hedge),
    }
}

fn plain(text: String, hedge: bool) -> AgentResponse {
    if hedge {
        AgentResponse::message(format!("{}{}", text, LOW_CONFIDENCE_HEDGE))
    } else {
        AgentResponse::message(text)
    }
}

fn ambiguity_listing(search: &str, matches: &[MatchSummary]) -> String {
    let mut text = format!(
        "I found {} interactions matching '{}'. Please narrow the name or edit by ID:\n",
        matches.len(),
        search
    );
    for m in matches {
        text.push_str(&format!(
            "\n- ID {}: {} on {}{}",
            m.id,
            m.hcp_name,
            m.date,
            if m.time.is_empty() {
                String::new()
            } else {
                format!(" at {}", m.time)
            }
        ));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcp_crm_core::{FieldUpdate, FormField, ToolOperation};

    fn decision(confidence: Confidence) -> RoutingDecision {
        RoutingDecision::new(ToolOperation::UpdateFormField, confidence, "test")
    }

    #[test]
    fn test_form_update_stays_structured() {
        let reply = ToolReply::FormUpdate {
            update: FieldUpdate::new(FormField::HcpSentiment, "Positive"),
            message: "Updated hcpSentiment to 'Positive'.".to_string(),
        };
        let response = compose(&decision(Confidence::High), reply);
        assert!(matches!(response, AgentResponse::FormUpdate { .. }));
    }

    #[test]
    fn test_low_confidence_hedges_plain_messages() {
        let reply = ToolReply::Updated {
            detail: "Updated interaction 3.".to_string(),
        };
        let response = compose(&decision(Confidence::Low), reply);
        assert!(response.text().contains("not entirely sure"));
    }

    #[test]
    fn test_structured_payloads_are_never_hedged() {
        let reply = ToolReply::FormUpdate {
            update: FieldUpdate::new(FormField::HcpSentiment, "Positive"),
            message: "Updated.".to_string(),
        };
        let response = compose(&decision(Confidence::Low), reply);
        assert!(!response.text().contains("not entirely sure"));
    }

    #[test]
    fn test_ambiguity_listing_includes_ids() {
        let reply = ToolReply::Ambiguous {
            search: "Singh".to_string(),
            matches: vec![
                MatchSummary {
                    id: 2,
                    hcp_name: "Dr. Ranbir Singh".to_string(),
                    date: "2024-06-02".to_string(),
                    time: "14:30".to_string(),
                },
                MatchSummary {
                    id: 1,
                    hcp_name: "Dr. Neha Singh".to_string(),
                    date: "2024-06-01".to_string(),
                    time: String::new(),
                },
            ],
        };
        let response = compose(&decision(Confidence::High), reply);
        let text = response.text();
        assert!(text.contains("2 interactions matching 'Singh'"));
        assert!(text.contains("ID 2: Dr. Ranbir Singh on 2024-06-02 at 14:30"));
        assert!(text.contains("ID 1: Dr. Neha Singh on 2024-06-01"));
    }
}
