//! Field-change mini-parser
//!
//! Edit commands carry their changes as free text ("change sentiment to
//! positive and time to 2:30 pm"). This parser splits the text into
//! clauses and matches each clause against per-field templates, producing
//! a typed partial update. Unrecognized clauses are dropped; an edit with
//! no recognized clause surfaces as an empty update upstream.

use once_cell::sync::Lazy;
use regex::Regex;

use hcp_crm_core::InteractionUpdate;
use hcp_crm_nlp::{normalize_value, parse_date, parse_time};

/// Record fields addressable by spoken name.
#[derive(Debug, Clone, Copy, PartialEq)]
enum RecordField {
    HcpName,
    Date,
    Time,
    Type,
    Attendees,
    Summary,
    Discussion,
    Materials,
    Samples,
    Sentiment,
    FollowUp,
}

/// Spoken field names, longest-first so "follow up actions" wins over
/// shorter overlapping names.
const FIELD_WORDS: [(&str, RecordField); 22] = [
    ("follow up actions", RecordField::FollowUp),
    ("follow-up actions", RecordField::FollowUp),
    ("followup actions", RecordField::FollowUp),
    ("discussion points", RecordField::Discussion),
    ("key discussion points", RecordField::Discussion),
    ("topics discussed", RecordField::Discussion),
    ("materials shared", RecordField::Materials),
    ("samples distributed", RecordField::Samples),
    ("interaction type", RecordField::Type),
    ("interaction date", RecordField::Date),
    ("interaction time", RecordField::Time),
    ("hcp name", RecordField::HcpName),
    ("follow up", RecordField::FollowUp),
    ("followup", RecordField::FollowUp),
    ("sentiment", RecordField::Sentiment),
    ("attendees", RecordField::Attendees),
    ("materials", RecordField::Materials),
    ("samples", RecordField::Samples),
    ("summary", RecordField::Summary),
    ("topics", RecordField::Discussion),
    ("date", RecordField::Date),
    ("time", RecordField::Time),
];

static RE_ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:please\s+)?(?:change|set|update|make|put)?\s*(?:the\s+)?(.+?)\s*(?:\bto\b|\bas\b|=|:)\s*(.+)$")
        .expect("valid regex")
});

/// Parse free text into a typed partial record update.
pub fn parse_record_changes(text: &str) -> InteractionUpdate {
    let mut update = InteractionUpdate::default();
    for clause in split_clauses(text) {
        if let Some((field, value)) = parse_clause(&clause) {
            assign(&mut update, field, &value);
        }
    }
    update
}

/// Parse a single "put <field> as <value>" style form assignment.
///
/// Unlike record changes, the field name is passed through raw; form
/// field normalization happens in the tool.
pub fn parse_field_assignment(text: &str) -> Option<(String, String)> {
    let caps = RE_ASSIGNMENT.captures(text.trim())?;
    let field = caps[1].trim().to_string();
    let value = unquote(caps[2].trim());
    if field.is_empty() || value.is_empty() {
        None
    } else {
        Some((field, value))
    }
}

fn split_clauses(text: &str) -> Vec<String> {
    static RE_CLAUSE_SEP: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)\s*(?:,|;|\band\b)\s*").expect("valid regex"));
    RE_CLAUSE_SEP
        .split(text)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_clause(clause: &str) -> Option<(RecordField, String)> {
    let (raw_field, raw_value) = parse_field_assignment(clause)?;
    let lowered = raw_field.to_lowercase();
    let field = FIELD_WORDS
        .iter()
        .find(|(words, _)| lowered.ends_with(words))
        .map(|(_, field)| *field)?;
    Some((field, raw_value))
}

fn assign(update: &mut InteractionUpdate, field: RecordField, value: &str) {
    match field {
        RecordField::HcpName => update.hcp_name = Some(value.to_string()),
        RecordField::Date => update.interaction_date = Some(parse_date(value)),
        RecordField::Time => {
            let time = parse_time(value);
            if !time.is_empty() {
                update.interaction_time = Some(time);
            }
        }
        RecordField::Type => {
            update.interaction_type = Some(normalize_value("interactionType", value))
        }
        RecordField::Attendees => update.attendees = Some(value.to_string()),
        RecordField::Summary => update.summary = Some(value.to_string()),
        RecordField::Discussion => update.key_discussion_points = Some(value.to_string()),
        RecordField::Materials => update.materials_shared = Some(value.to_string()),
        RecordField::Samples => update.samples_distributed = Some(value.to_string()),
        RecordField::Sentiment => update.sentiment = Some(normalize_value("hcpSentiment", value)),
        RecordField::FollowUp => update.follow_up_actions = Some(value.to_string()),
    }
}

fn unquote(value: &str) -> String {
    value
        .trim()
        .trim_matches(|c| c == '\'' || c == '"')
        .trim()
        .to_string()
}
