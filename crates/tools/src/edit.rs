//! Record edits
//!
//! Two addressing modes: by record id, and by HCP name search. The name
//! path only mutates when the search resolves to exactly one record;
//! anything ambiguous is surfaced back to the user with the candidate
//! list and nothing is written.

use std::sync::Arc;

use hcp_crm_core::{
    Error, InteractionRecord, InteractionStore, InteractionUpdate, MatchSummary, ToolReply,
};

use crate::search::find_interactions;

/// Candidates shown when a name search is ambiguous.
const MAX_LISTED_MATCHES: usize = 10;

const NO_CHANGES: &str =
    "I couldn't find any recognizable field changes in your request. Try something like 'change the sentiment to positive'.";

pub async fn edit_interaction(
    store: &Arc<dyn InteractionStore>,
    interaction_id: i64,
    update: InteractionUpdate,
) -> ToolReply {
    if update.is_empty() {
        return ToolReply::failed(NO_CHANGES);
    }

    match store.find_by_id(interaction_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return ToolReply::not_found(format!(
                "No interaction found with ID {}.",
                interaction_id
            ))
        }
        Err(e) => return storage_failure(e),
    }

    let touched = update.touched_fields().join(", ");
    match store.update(interaction_id, update).await {
        Ok(record) => ToolReply::Updated {
            detail: format!(
                "Updated interaction {} with {} ({}).",
                record.id, record.hcp_name, touched
            ),
        },
        Err(e) => storage_failure(e),
    }
}

pub async fn edit_interaction_by_name(
    store: &Arc<dyn InteractionStore>,
    search: &str,
    update: InteractionUpdate,
) -> ToolReply {
    if update.is_empty() {
        return ToolReply::failed(NO_CHANGES);
    }
    if search.trim().is_empty() {
        return ToolReply::failed(
            "Please tell me which interaction to edit, by ID or by HCP name.",
        );
    }

    let matches = match find_interactions(store, search).await {
        Ok(matches) => matches,
        Err(e) => return storage_failure(e),
    };

    match matches.len() {
        0 => ToolReply::not_found(format!("No interactions found for {}.", search.trim())),
        1 => edit_interaction(store, matches[0].id, update).await,
        n => {
            tracing::info!(search, matches = n, "ambiguous edit, no mutation applied");
            ToolReply::Ambiguous {
                search: search.trim().to_string(),
                matches: matches
                    .iter()
                    .take(MAX_LISTED_MATCHES)
                    .map(summarize)
                    .collect(),
            }
        }
    }
}

fn summarize(record: &InteractionRecord) -> MatchSummary {
    MatchSummary {
        id: record.id,
        hcp_name: record.hcp_name.clone(),
        date: record.interaction_date.format("%Y-%m-%d").to_string(),
        time: record.interaction_time.clone(),
    }
}

fn storage_failure(e: Error) -> ToolReply {
    tracing::error!(error = %e, "storage operation failed");
    ToolReply::failed("Something went wrong while accessing interaction records. Please try again.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hcp_crm_core::InteractionDraft;
    use hcp_crm_storage::InMemoryStore;

    fn sentiment_update(value: &str) -> InteractionUpdate {
        InteractionUpdate {
            sentiment: Some(value.to_string()),
            ..Default::default()
        }
    }

    async fn seeded(names: &[&str]) -> Arc<dyn InteractionStore> {
        let store = Arc::new(InMemoryStore::new());
        for name in names {
            store
                .insert(InteractionDraft {
                    hcp_name: name.to_string(),
                    interaction_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                    ..Default::default()
                })
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_edit_by_id_updates_record() {
        let store = seeded(&["Dr. Patel"]).await;
        let id = store.find_by_name_substring("Patel").await.unwrap()[0].id;

        let reply = edit_interaction(&store, id, sentiment_update("Positive")).await;
        match reply {
            ToolReply::Updated { detail } => {
                assert!(detail.contains("Dr. Patel"));
                assert!(detail.contains("sentiment"));
            }
            other => panic!("expected Updated, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_edit_unknown_id() {
        let store = seeded(&[]).await;
        let reply = edit_interaction(&store, 42, sentiment_update("Positive")).await;
        assert!(matches!(reply, ToolReply::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_empty_update_is_rejected_before_lookup() {
        let store = seeded(&["Dr. Patel"]).await;
        let reply = edit_interaction(&store, 1, InteractionUpdate::default()).await;
        assert!(matches!(reply, ToolReply::Failed { .. }));
    }

    #[tokio::test]
    async fn test_edit_by_name_single_match() {
        let store = seeded(&["Dr. Singh", "Dr. Brown"]).await;
        let reply = edit_interaction_by_name(&store, "Singh", sentiment_update("Negative")).await;
        assert!(matches!(reply, ToolReply::Updated { .. }));
    }

    #[tokio::test]
    async fn test_ambiguous_edit_lists_matches_without_mutating() {
        let store = seeded(&["Dr. Neha Singh", "Dr. Ranbir Singh"]).await;
        let reply = edit_interaction_by_name(&store, "Singh", sentiment_update("Positive")).await;

        match reply {
            ToolReply::Ambiguous { search, matches } => {
                assert_eq!(search, "Singh");
                assert_eq!(matches.len(), 2);
            }
            other => panic!("expected Ambiguous, got {:?}", other),
        }

        // Neither record was touched.
        for record in store.find_by_name_substring("Singh").await.unwrap() {
            assert_eq!(record.sentiment, "");
        }
    }

    #[tokio::test]
    async fn test_edit_by_name_no_match() {
        let store = seeded(&["Dr. Brown"]).await;
        let reply = edit_interaction_by_name(&store, "Dr. Green", sentiment_update("Positive")).await;
        match reply {
            ToolReply::NotFound { message } => {
                assert_eq!(message, "No interactions found for Dr. Green.")
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }
}
