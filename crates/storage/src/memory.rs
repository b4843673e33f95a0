//! In-memory interaction store

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

use hcp_crm_core::{
    InteractionDraft, InteractionRecord, InteractionStore, InteractionUpdate, Result,
};

use crate::StorageError;

/// Thread-safe in-memory store.
///
/// Mutations take the write lock for the duration of one record change,
/// which gives each update the single-record atomicity the tools rely on.
#[derive(Default)]
pub struct InMemoryStore {
    records: RwLock<Vec<InteractionRecord>>,
    next_id: AtomicI64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, for health reporting and tests.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

fn apply(record: &mut InteractionRecord, update: InteractionUpdate) {
    if let Some(v) = update.hcp_name {
        record.hcp_name = v;
    }
    if let Some(v) = update.interaction_date {
        record.interaction_date = v;
    }
    if let Some(v) = update.interaction_time {
        record.interaction_time = v;
    }
    if let Some(v) = update.interaction_type {
        record.interaction_type = v;
    }
    if let Some(v) = update.attendees {
        record.attendees = v;
    }
    if let Some(v) = update.summary {
        record.summary = v;
    }
    if let Some(v) = update.key_discussion_points {
        record.key_discussion_points = v;
    }
    if let Some(v) = update.materials_shared {
        record.materials_shared = v;
    }
    if let Some(v) = update.samples_distributed {
        record.samples_distributed = v;
    }
    if let Some(v) = update.sentiment {
        record.sentiment = v;
    }
    if let Some(v) = update.follow_up_actions {
        record.follow_up_actions = v;
    }
    record.updated_at = Utc::now();
}

#[async_trait]
impl InteractionStore for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<InteractionRecord>> {
        Ok(self.records.read().iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_name_substring(&self, search: &str) -> Result<Vec<InteractionRecord>> {
        let needle = search.trim().to_lowercase();
        let mut matches: Vec<InteractionRecord> = self
            .records
            .read()
            .iter()
            .filter(|r| r.hcp_name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matches)
    }

    async fn insert(&self, draft: InteractionDraft) -> Result<InteractionRecord> {
        if draft.hcp_name.trim().is_empty() {
            return Err(StorageError::InvalidRecord("hcp_name must not be empty".to_string()).into());
        }

        let now = Utc::now();
        let record = InteractionRecord {
            id: self.next_id.fetch_add(1, Ordering::Relaxed) + 1,
            hcp_name: draft.hcp_name,
            interaction_date: draft.interaction_date,
            interaction_time: draft.interaction_time,
            interaction_type: draft.interaction_type,
            attendees: draft.attendees,
            summary: draft.summary,
            key_discussion_points: draft.key_discussion_points,
            materials_shared: draft.materials_shared,
            samples_distributed: draft.samples_distributed,
            sentiment: draft.sentiment,
            follow_up_actions: draft.follow_up_actions,
            created_at: now,
            updated_at: now,
        };

        tracing::debug!(id = %record.id, hcp = %record.hcp_name, "inserted interaction");
        self.records.write().push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: i64, update: InteractionUpdate) -> Result<InteractionRecord> {
        let mut records = self.records.write();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        apply(record, update);
        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn draft(name: &str) -> InteractionDraft {
        InteractionDraft {
            hcp_name: name.to_string(),
            interaction_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = InMemoryStore::new();
        let record = store.insert(draft("Dr. Sarah Johnson")).await.unwrap();

        let found = store.find_by_id(record.id).await.unwrap().unwrap();
        assert_eq!(found.hcp_name, "Dr. Sarah Johnson");
    }

    #[tokio::test]
    async fn test_insert_rejects_empty_name() {
        let store = InMemoryStore::new();
        assert!(store.insert(draft("  ")).await.is_err());
    }

    #[tokio::test]
    async fn test_substring_search_is_case_insensitive_newest_first() {
        let store = InMemoryStore::new();
        store.insert(draft("Dr. Neha Singh")).await.unwrap();
        store.insert(draft("Dr. Ranbir Singh")).await.unwrap();
        store.insert(draft("Dr. Brown")).await.unwrap();

        let matches = store.find_by_name_substring("singh").await.unwrap();
        assert_eq!(matches.len(), 2);
        // Newest first by creation time.
        assert_eq!(matches[0].hcp_name, "Dr. Ranbir Singh");
        assert_eq!(matches[1].hcp_name, "Dr. Neha Singh");
    }

    #[tokio::test]
    async fn test_update_applies_partial_fields() {
        let store = InMemoryStore::new();
        let record = store.insert(draft("Dr. Patel")).await.unwrap();

        let updated = store
            .update(
                record.id,
                InteractionUpdate {
                    sentiment: Some("Positive".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.sentiment, "Positive");
        assert_eq!(updated.hcp_name, "Dr. Patel");
        assert!(updated.updated_at >= updated.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let store = InMemoryStore::new();
        let err = store
            .update(999, InteractionUpdate::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
