//! Command routing
//!
//! Two interchangeable strategies resolve user text into a
//! `RoutingDecision`: a deterministic pattern cascade for prefix-marked
//! commands, and a model-backed semantic router for natural phrasing.
//! Both emit only operations from the closed set with plain string
//! entities; neither executes anything.

pub mod deterministic;
pub mod semantic;

use async_trait::async_trait;

use hcp_crm_core::RoutingDecision;

pub use deterministic::DeterministicRouter;
pub use semantic::SemanticRouter;

/// Entity keys shared by both router strategies.
pub mod entity {
    pub const HCP_NAME: &str = "hcp_name";
    pub const INTERACTION_ID: &str = "interaction_id";
    pub const CHANGES: &str = "changes";
    pub const FIELD: &str = "field";
    pub const VALUE: &str = "value";
    pub const PERIOD_DAYS: &str = "period_days";
    pub const RAW_TEXT: &str = "raw_text";
    /// Usage hint carried by an error decision for a malformed command.
    pub const USAGE: &str = "usage";
}

/// Resolves one user message to an operation.
#[async_trait]
pub trait CommandRouter: Send + Sync {
    async fn route(&self, text: &str) -> RoutingDecision;
}
