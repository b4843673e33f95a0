//! Interaction record types
//!
//! The persisted unit is an interaction between a sales rep and a
//! healthcare professional. Records are created by the logging flow,
//! mutated in place by the edit flows, and never deleted here.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Interaction category labels accepted for the type field.
pub const INTERACTION_TYPES: [&str; 6] = ["Meeting", "Call", "Email", "Visit", "Conference", "Other"];

/// Sentiment category labels accepted for the sentiment field.
pub const SENTIMENTS: [&str; 3] = ["Positive", "Neutral", "Negative"];

/// A persisted HCP interaction record.
///
/// `hcp_name` and `interaction_date` are always present; everything else
/// is optional free text. `interaction_time` is a 24-hour `HH:MM` string
/// or empty, matching the form's time input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub id: i64,
    pub hcp_name: String,
    pub interaction_date: NaiveDate,
    #[serde(default)]
    pub interaction_time: String,
    #[serde(default)]
    pub interaction_type: String,
    #[serde(default)]
    pub attendees: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub key_discussion_points: String,
    #[serde(default)]
    pub materials_shared: String,
    #[serde(default)]
    pub samples_distributed: String,
    #[serde(default)]
    pub sentiment: String,
    #[serde(default)]
    pub follow_up_actions: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a new interaction record.
///
/// Identity and timestamps are assigned by the storage layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InteractionDraft {
    pub hcp_name: String,
    pub interaction_date: NaiveDate,
    #[serde(default)]
    pub interaction_time: String,
    #[serde(default)]
    pub interaction_type: String,
    #[serde(default)]
    pub attendees: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub key_discussion_points: String,
    #[serde(default)]
    pub materials_shared: String,
    #[serde(default)]
    pub samples_distributed: String,
    #[serde(default)]
    pub sentiment: String,
    #[serde(default)]
    pub follow_up_actions: String,
}

/// Partial update applied to an existing record.
///
/// `None` fields are left untouched by the storage layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InteractionUpdate {
    pub hcp_name: Option<String>,
    pub interaction_date: Option<NaiveDate>,
    pub interaction_time: Option<String>,
    pub interaction_type: Option<String>,
    pub attendees: Option<String>,
    pub summary: Option<String>,
    pub key_discussion_points: Option<String>,
    pub materials_shared: Option<String>,
    pub samples_distributed: Option<String>,
    pub sentiment: Option<String>,
    pub follow_up_actions: Option<String>,
}

impl InteractionUpdate {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.hcp_name.is_none()
            && self.interaction_date.is_none()
            && self.interaction_time.is_none()
            && self.interaction_type.is_none()
            && self.attendees.is_none()
            && self.summary.is_none()
            && self.key_discussion_points.is_none()
            && self.materials_shared.is_none()
            && self.samples_distributed.is_none()
            && self.sentiment.is_none()
            && self.follow_up_actions.is_none()
    }

    /// Names of the fields this update touches, for user-facing detail.
    pub fn touched_fields(&self) -> Vec<&'static str> {
        let mut touched = Vec::new();
        if self.hcp_name.is_some() {
            touched.push("hcp name");
        }
        if self.interaction_date.is_some() {
            touched.push("date");
        }
        if self.interaction_time.is_some() {
            touched.push("time");
        }
        if self.interaction_type.is_some() {
            touched.push("interaction type");
        }
        if self.attendees.is_some() {
            touched.push("attendees");
        }
        if self.summary.is_some() {
            touched.push("summary");
        }
        if self.key_discussion_points.is_some() {
            touched.push("discussion points");
        }
        if self.materials_shared.is_some() {
            touched.push("materials shared");
        }
        if self.samples_distributed.is_some() {
            touched.push("samples distributed");
        }
        if self.sentiment.is_some() {
            touched.push("sentiment");
        }
        if self.follow_up_actions.is_some() {
            touched.push("follow-up actions");
        }
        touched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_update() {
        let update = InteractionUpdate::default();
        assert!(update.is_empty());
        assert!(update.touched_fields().is_empty());
    }

    #[test]
    fn test_touched_fields() {
        let update = InteractionUpdate {
            sentiment: Some("Positive".to_string()),
            interaction_time: Some("14:30".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
        assert_eq!(update.touched_fields(), vec!["time", "sentiment"]);
    }
}
