//! Interaction logging
//!
//! Turns a narrative like "met Dr. Sarah Johnson this morning at 9:15
//! about the cardiology trial" into a set of form field updates. The
//! record itself is only persisted when the user submits the reviewed
//! form, so this tool never writes to the store.

use hcp_crm_core::{FieldUpdate, FormField, ToolReply};
use hcp_crm_nlp::{normalize_value, parse_date, parse_time, EntityExtractor};

const IDENTIFICATION_FAILED: &str =
    "Could not identify HCP from the interaction text. Please specify the HCP name more clearly.";

pub async fn log_interaction(extractor: &EntityExtractor, raw_text: &str) -> ToolReply {
    let entities = extractor.extract(raw_text).await;

    if entities.hcp_name.trim().is_empty() {
        tracing::info!("logging narrative had no identifiable HCP");
        return ToolReply::failed(IDENTIFICATION_FAILED);
    }

    let date = parse_date(&entities.interaction_date)
        .format("%Y-%m-%d")
        .to_string();
    let time = parse_time(&entities.interaction_time);

    let mut field_updates = vec![
        FieldUpdate::new(FormField::HcpName, entities.hcp_name.trim()),
        FieldUpdate::new(FormField::Date, date),
    ];

    let mut push = |field: FormField, value: &str| {
        if !value.trim().is_empty() {
            field_updates.push(FieldUpdate::new(field, value.trim()));
        }
    };

    push(
        FormField::InteractionType,
        &normalize_value(FormField::InteractionType.as_str(), &entities.interaction_type),
    );
    push(FormField::Time, &time);
    push(FormField::Attendees, &entities.attendees);
    push(FormField::TopicsDiscussed, &entities.key_discussion_points);
    push(FormField::MaterialsShared, &entities.materials_shared);
    push(FormField::SamplesDistributed, &entities.samples_distributed);
    push(
        FormField::HcpSentiment,
        &normalize_value(FormField::HcpSentiment.as_str(), &entities.sentiment),
    );
    push(FormField::Outcomes, &entities.summary);
    push(FormField::FollowUpActions, &entities.follow_up_actions);

    let message = format!(
        "I've analyzed your interaction with {} and populated the form. Please review the details and submit when ready.",
        entities.hcp_name.trim()
    );

    ToolReply::FormPopulate {
        field_updates,
        message,
    }
}
