//! Natural-language processing for HCP interaction narratives
//!
//! Features:
//! - Temporal normalization ("late afternoon around 4" -> "16:00")
//! - Field and value normalization onto the canonical form vocabulary
//! - Entity extraction via the completion model with a local fallback
//! - JSON-body isolation for prose-wrapped model output

pub mod extract;
pub mod fields;
pub mod json;
pub mod temporal;

pub use extract::{EntityExtractor, EntityMap};
pub use fields::{normalize_field, normalize_value};
pub use json::extract_json_block;
pub use temporal::{parse_date, parse_time};
