//! CRM tool implementations
//!
//! Each operation the routers can select is implemented here against the
//! `InteractionStore` and `CompletionModel` traits. Tools never format
//! final user wording beyond their base message; they return a typed
//! `ToolReply` and the response composer owns the rest.

pub mod edit;
pub mod form;
pub mod history;
pub mod insights;
pub mod invocation;
pub mod log;
pub mod registry;
mod search;

pub use invocation::ToolInvocation;
pub use registry::ToolRegistry;
