//! Interaction record storage
//!
//! The relational database lives behind `InteractionStore`; this crate
//! ships the in-memory implementation used in development and tests.
//! Name search is a case-insensitive substring match returning records
//! newest-first by creation time.

pub mod memory;

pub use memory::InMemoryStore;

use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StorageError> for hcp_crm_core::Error {
    fn from(err: StorageError) -> Self {
        hcp_crm_core::Error::Storage(err.to_string())
    }
}
