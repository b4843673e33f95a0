//! Canonical form-field vocabulary
//!
//! The frontend form keys are fixed; FORM_UPDATE and FORM_POPULATE
//! payloads must use these exact names.

use serde::{Deserialize, Serialize};

/// The eleven canonical form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormField {
    HcpName,
    InteractionType,
    Date,
    Time,
    Attendees,
    TopicsDiscussed,
    MaterialsShared,
    SamplesDistributed,
    HcpSentiment,
    Outcomes,
    FollowUpActions,
}

impl FormField {
    /// The wire key used in form payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::HcpName => "hcpName",
            FormField::InteractionType => "interactionType",
            FormField::Date => "date",
            FormField::Time => "time",
            FormField::Attendees => "attendees",
            FormField::TopicsDiscussed => "topicsDiscussed",
            FormField::MaterialsShared => "materialsShared",
            FormField::SamplesDistributed => "samplesDistributed",
            FormField::HcpSentiment => "hcpSentiment",
            FormField::Outcomes => "outcomes",
            FormField::FollowUpActions => "followUpActions",
        }
    }

    /// Look up a canonical field by its exact wire key.
    pub fn from_key(key: &str) -> Option<Self> {
        Some(match key {
            "hcpName" => FormField::HcpName,
            "interactionType" => FormField::InteractionType,
            "date" => FormField::Date,
            "time" => FormField::Time,
            "attendees" => FormField::Attendees,
            "topicsDiscussed" => FormField::TopicsDiscussed,
            "materialsShared" => FormField::MaterialsShared,
            "samplesDistributed" => FormField::SamplesDistributed,
            "hcpSentiment" => FormField::HcpSentiment,
            "outcomes" => FormField::Outcomes,
            "followUpActions" => FormField::FollowUpActions,
            _ => return None,
        })
    }

    /// All canonical fields in form order.
    pub fn all() -> [FormField; 11] {
        [
            FormField::HcpName,
            FormField::InteractionType,
            FormField::Date,
            FormField::Time,
            FormField::Attendees,
            FormField::TopicsDiscussed,
            FormField::MaterialsShared,
            FormField::SamplesDistributed,
            FormField::HcpSentiment,
            FormField::Outcomes,
            FormField::FollowUpActions,
        ]
    }

    /// Fields the form requires before submission.
    pub fn required() -> [FormField; 3] {
        [FormField::HcpName, FormField::InteractionType, FormField::Date]
    }
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (field, value) pair handed to the frontend form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldUpdate {
    pub field: String,
    pub value: String,
}

impl FieldUpdate {
    pub fn new(field: FormField, value: impl Into<String>) -> Self {
        Self {
            field: field.as_str().to_string(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_keys_round_trip() {
        for field in FormField::all() {
            assert_eq!(FormField::from_key(field.as_str()), Some(field));
        }
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(FormField::from_key("sentiment"), None);
    }
}
