//! Name search with honorific widening

use std::sync::Arc;

use hcp_crm_core::{InteractionRecord, InteractionStore, Result};

/// Substring search that retries without the "Dr." honorific.
///
/// Users often say "Dr. Johnson" while the record was saved as
/// "Dr. Sarah Johnson"; the honorific form would still match, but
/// "Doctor Johnson" or a mistyped prefix would not. When the full
/// search misses and it looks like an honorific plus surname, retry
/// with the surname alone.
pub(crate) async fn find_interactions(
    store: &Arc<dyn InteractionStore>,
    search: &str,
) -> Result<Vec<InteractionRecord>> {
    let matches = store.find_by_name_substring(search).await?;
    if !matches.is_empty() {
        return Ok(matches);
    }

    if let Some(surname) = surname_of(search) {
        tracing::debug!(search, surname, "widening name search to surname");
        return store.find_by_name_substring(&surname).await;
    }

    Ok(matches)
}

/// Last word of an honorific-prefixed name, when distinct from the input.
fn surname_of(search: &str) -> Option<String> {
    let trimmed = search.trim();
    let lowered = trimmed.to_lowercase();
    let prefixed = lowered.starts_with("dr.") || lowered.starts_with("dr ") || lowered.starts_with("doctor ");
    if !prefixed {
        return None;
    }
    let last = trimmed.split_whitespace().last()?;
    if last.eq_ignore_ascii_case(trimmed) {
        None
    } else {
        Some(last.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surname_extraction() {
        assert_eq!(surname_of("Dr. Sarah Johnson"), Some("Johnson".to_string()));
        assert_eq!(surname_of("Doctor Patel"), Some("Patel".to_string()));
        assert_eq!(surname_of("Sarah Johnson"), None);
        assert_eq!(surname_of("Dr."), None);
    }
}
