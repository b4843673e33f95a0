//! Field and value normalization
//!
//! Maps the loose vocabulary users type ("feeling", "doctor", "topics")
//! onto the canonical form-field keys, and loose category values
//! ("good", "happy", "phone") onto the fixed category labels. Both
//! functions are idempotent: canonical input passes through unchanged.

use hcp_crm_core::FormField;

/// Synonym table onto the canonical field keys.
///
/// Lookup is case-insensitive and tolerates spaces in place of
/// underscores. Unrecognized names pass through unchanged, treated as
/// already canonical.
const FIELD_SYNONYMS: [(&str, FormField); 29] = [
    // Primary field names
    ("sentiment", FormField::HcpSentiment),
    ("interaction_type", FormField::InteractionType),
    ("summary", FormField::Outcomes),
    ("key_discussion_points", FormField::TopicsDiscussed),
    ("materials_shared", FormField::MaterialsShared),
    ("samples_distributed", FormField::SamplesDistributed),
    ("follow_up_actions", FormField::FollowUpActions),
    ("attendees", FormField::Attendees),
    ("date", FormField::Date),
    ("time", FormField::Time),
    ("hcp_name", FormField::HcpName),
    // Alternative names accepted from PUT commands
    ("materials", FormField::MaterialsShared),
    ("samples", FormField::SamplesDistributed),
    ("follow_up", FormField::FollowUpActions),
    ("topics", FormField::TopicsDiscussed),
    ("discussion", FormField::TopicsDiscussed),
    ("outcomes", FormField::Outcomes),
    ("results", FormField::Outcomes),
    ("type", FormField::InteractionType),
    ("interaction_date", FormField::Date),
    ("interaction_time", FormField::Time),
    ("name", FormField::HcpName),
    ("doctor", FormField::HcpName),
    ("hcp", FormField::HcpName),
    // Sentiment variations
    ("feeling", FormField::HcpSentiment),
    ("mood", FormField::HcpSentiment),
    ("reaction", FormField::HcpSentiment),
    // Date/time variations
    ("when", FormField::Date),
    ("meeting_date", FormField::Date),
];

/// Extra date/time synonyms that only make sense with the underscore form.
const FIELD_SYNONYMS_EXTRA: [(&str, FormField); 1] = [("meeting_time", FormField::Time)];

const SENTIMENT_VALUES: [(&str, &str); 13] = [
    ("positive", "Positive"),
    ("good", "Positive"),
    ("happy", "Positive"),
    ("pleased", "Positive"),
    ("satisfied", "Positive"),
    ("neutral", "Neutral"),
    ("okay", "Neutral"),
    ("fine", "Neutral"),
    ("average", "Neutral"),
    ("negative", "Negative"),
    ("bad", "Negative"),
    ("unhappy", "Negative"),
    ("dissatisfied", "Negative"),
];

const TYPE_VALUES: [(&str, &str); 7] = [
    ("meeting", "Meeting"),
    ("call", "Call"),
    ("phone", "Call"),
    ("email", "Email"),
    ("visit", "Visit"),
    ("conference", "Conference"),
    ("other", "Other"),
];

/// Remaining negative synonyms kept out of the main table for clarity.
const SENTIMENT_VALUES_EXTRA: [(&str, &str); 1] = [("concerned", "Negative")];

fn lookup_field(key: &str) -> Option<FormField> {
    FIELD_SYNONYMS
        .iter()
        .chain(FIELD_SYNONYMS_EXTRA.iter())
        .find(|(synonym, _)| *synonym == key)
        .map(|(_, field)| *field)
}

/// Resolve a loosely-named field to a canonical `FormField`, if known.
pub fn canonical_field(name: &str) -> Option<FormField> {
    let key = name.trim().to_lowercase();
    lookup_field(&key).or_else(|| lookup_field(&key.replace(' ', "_")))
}

/// Normalize a field name to its canonical wire key.
///
/// Unrecognized names come back unchanged; canonical wire keys are not
/// in the synonym table and therefore pass through, which makes this
/// idempotent.
pub fn normalize_field(name: &str) -> String {
    match canonical_field(name) {
        Some(field) => field.as_str().to_string(),
        None => name.to_string(),
    }
}

/// Normalize a value for a canonical field key.
///
/// Sentiment and interaction-type values are mapped onto their fixed
/// category labels, case-insensitively; every other field passes the
/// value through unchanged. Idempotent: canonical labels map to
/// themselves.
pub fn normalize_value(field_key: &str, value: &str) -> String {
    let lowered = value.trim().to_lowercase();

    if field_key == FormField::HcpSentiment.as_str() {
        if let Some((_, label)) = SENTIMENT_VALUES
            .iter()
            .chain(SENTIMENT_VALUES_EXTRA.iter())
            .find(|(word, _)| *word == lowered)
        {
            return label.to_string();
        }
    }

    if field_key == FormField::InteractionType.as_str() {
        if let Some((_, label)) = TYPE_VALUES.iter().find(|(word, _)| *word == lowered) {
            return label.to_string();
        }
    }

    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_synonyms() {
        assert_eq!(normalize_field("sentiment"), "hcpSentiment");
        assert_eq!(normalize_field("doctor"), "hcpName");
        assert_eq!(normalize_field("feeling"), "hcpSentiment");
        assert_eq!(normalize_field("when"), "date");
        assert_eq!(normalize_field("topics"), "topicsDiscussed");
    }

    #[test]
    fn test_field_spacing_variants() {
        assert_eq!(normalize_field("interaction type"), "interactionType");
        assert_eq!(normalize_field("Follow Up"), "followUpActions");
        assert_eq!(normalize_field("meeting time"), "time");
    }

    #[test]
    fn test_unknown_field_passes_through() {
        assert_eq!(normalize_field("specialty"), "specialty");
    }

    #[test]
    fn test_field_normalization_idempotent() {
        for field in FormField::all() {
            let key = field.as_str();
            assert_eq!(normalize_field(&normalize_field(key)), normalize_field(key));
        }
    }

    #[test]
    fn test_sentiment_values() {
        assert_eq!(normalize_value("hcpSentiment", "happy"), "Positive");
        assert_eq!(normalize_value("hcpSentiment", "OKAY"), "Neutral");
        assert_eq!(normalize_value("hcpSentiment", "concerned"), "Negative");
        // Unknown values pass through.
        assert_eq!(normalize_value("hcpSentiment", "ecstatic"), "ecstatic");
    }

    #[test]
    fn test_type_values() {
        assert_eq!(normalize_value("interactionType", "phone"), "Call");
        assert_eq!(normalize_value("interactionType", "Meeting"), "Meeting");
    }

    #[test]
    fn test_other_fields_untouched() {
        assert_eq!(normalize_value("attendees", "happy"), "happy");
    }

    #[test]
    fn test_value_normalization_idempotent() {
        for field in FormField::all() {
            let key = field.as_str();
            for value in ["happy", "Positive", "phone", "Call", "whatever"] {
                let once = normalize_value(key, value);
                assert_eq!(normalize_value(key, &once), once);
            }
        }
    }
}
