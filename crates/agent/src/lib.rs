//! CRM assistant core
//!
//! Wires the routers, tool registry and response composer into one
//! request pipeline. The HTTP layer constructs an [`Agent`] at startup
//! and calls [`Agent::handle`] per chat message.

pub mod compose;
pub mod conversation;
pub mod pipeline;
pub mod router;
pub mod updates;

pub use conversation::ConversationHandler;
pub use pipeline::{Agent, AgentOptions};
pub use router::{CommandRouter, DeterministicRouter, SemanticRouter};
