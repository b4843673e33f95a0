//! Interaction history listing

use std::sync::Arc;

use hcp_crm_core::{InteractionRecord, InteractionStore, ToolReply};

use crate::search::find_interactions;

/// Summary text is clipped to keep the listing scannable.
const SUMMARY_PREVIEW: usize = 100;

pub async fn get_interaction_history(
    store: &Arc<dyn InteractionStore>,
    search: &str,
) -> ToolReply {
    if search.trim().is_empty() {
        return ToolReply::failed("Please tell me which HCP's history you'd like to see.");
    }

    let matches = match find_interactions(store, search).await {
        Ok(matches) => matches,
        Err(e) => {
            tracing::error!(error = %e, "history lookup failed");
            return ToolReply::failed(
                "Something went wrong while accessing interaction records. Please try again.",
            );
        }
    };

    if matches.is_empty() {
        return ToolReply::not_found(format!("No interactions found for {}.", search.trim()));
    }

    let mut body = format!(
        "Found {} interaction{} for {}:\n",
        matches.len(),
        if matches.len() == 1 { "" } else { "s" },
        search.trim()
    );
    for record in &matches {
        body.push('\n');
        body.push_str(&format_line(record));
    }

    ToolReply::Report { body }
}

fn format_line(record: &InteractionRecord) -> String {
    let mut line = format!(
        "ID {} | {} {} | {} with {}",
        record.id,
        record.interaction_date.format("%Y-%m-%d"),
        if record.interaction_time.is_empty() {
            "--:--"
        } else {
            &record.interaction_time
        },
        if record.interaction_type.is_empty() {
            "Interaction"
        } else {
            &record.interaction_type
        },
        record.hcp_name
    );
    if !record.sentiment.is_empty() {
        line.push_str(&format!(" [{}]", record.sentiment));
    }
    if !record.summary.is_empty() {
        line.push_str("\n  ");
        line.push_str(&preview(&record.summary));
    }
    line
}

fn preview(text: &str) -> String {
    if text.chars().count() > SUMMARY_PREVIEW {
        let cut: String = text.chars().take(SUMMARY_PREVIEW).collect();
        format!("{}...", cut.trim_end())
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hcp_crm_core::InteractionDraft;
    use hcp_crm_storage::InMemoryStore;

    fn draft(name: &str, summary: &str) -> InteractionDraft {
        InteractionDraft {
            hcp_name: name.to_string(),
            interaction_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            interaction_type: "Meeting".to_string(),
            summary: summary.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_no_history() {
        let store: Arc<dyn InteractionStore> = Arc::new(InMemoryStore::new());
        let reply = get_interaction_history(&store, "Dr. Johnson").await;
        match reply {
            ToolReply::NotFound { message } => {
                assert_eq!(message, "No interactions found for Dr. Johnson.")
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_listing_counts_and_previews() {
        let store: Arc<dyn InteractionStore> = Arc::new(InMemoryStore::new());
        store.insert(draft("Dr. Amit Patel", &"x".repeat(150))).await.unwrap();
        store.insert(draft("Dr. Amit Patel", "short summary")).await.unwrap();

        let reply = get_interaction_history(&store, "Patel").await;
        match reply {
            ToolReply::Report { body } => {
                assert!(body.starts_with("Found 2 interactions for Patel:"));
                assert!(body.contains("short summary"));
                assert!(body.contains("..."));
            }
            other => panic!("expected Report, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_surname_widening_finds_full_name_records() {
        let store: Arc<dyn InteractionStore> = Arc::new(InMemoryStore::new());
        store.insert(draft("Sarah Johnson", "trial kickoff")).await.unwrap();

        // "Dr. Johnson" misses the stored name only through the honorific.
        let reply = get_interaction_history(&store, "Dr. Johnson").await;
        assert!(matches!(reply, ToolReply::Report { .. }));
    }
}
