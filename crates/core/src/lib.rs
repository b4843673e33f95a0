//! Core types for the HCP CRM assistant
//!
//! This crate provides the foundational types shared across all other crates:
//! - Interaction records and partial updates
//! - The closed operation set and routing decision produced by the routers
//! - Typed tool replies (no string sentinels at the execution boundary)
//! - The canonical form-field vocabulary exposed to the frontend
//! - Collaborator traits for storage and the hosted completion model

pub mod error;
pub mod fields;
pub mod interaction;
pub mod reply;
pub mod routing;
pub mod traits;

pub use error::{Error, Result};
pub use fields::{FieldUpdate, FormField};
pub use interaction::{InteractionDraft, InteractionRecord, InteractionUpdate};
pub use reply::{AgentResponse, MatchSummary, ToolReply};
pub use routing::{Confidence, RoutingDecision, ToolOperation};
pub use traits::{CompletionModel, InteractionStore};
