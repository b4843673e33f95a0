//! Collaborator traits
//!
//! The core never owns persistent state or network clients directly;
//! it works against these traits, constructed once at process start
//! and injected where needed.

use async_trait::async_trait;
use crate::error::Result;
use crate::interaction::{InteractionDraft, InteractionRecord, InteractionUpdate};

/// Storage interface for interaction records.
///
/// Name search is a case-insensitive substring match, returning matches
/// newest-first by creation time. Each mutation is a single atomic
/// operation scoped to one record.
#[async_trait]
pub trait InteractionStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<InteractionRecord>>;

    async fn find_by_name_substring(&self, search: &str) -> Result<Vec<InteractionRecord>>;

    async fn insert(&self, draft: InteractionDraft) -> Result<InteractionRecord>;

    async fn update(&self, id: i64, update: InteractionUpdate) -> Result<InteractionRecord>;
}

/// The hosted text-completion model.
///
/// Implementations may fail (network, auth, rate limit) or return
/// malformed content; callers never assume well-formed JSON.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Send a prompt, get free text back.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Model identifier for logs.
    fn model_name(&self) -> &str;
}
