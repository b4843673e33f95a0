//! Form field operations
//!
//! These never touch the store: `update_form_field` resolves a spoken
//! field name and value onto the canonical form vocabulary, and
//! `form_information` reports on the snapshot the frontend sent along
//! with the request.

use std::collections::HashMap;

use hcp_crm_core::{FieldUpdate, FormField, ToolReply};
use hcp_crm_nlp::{normalize_field, normalize_value, parse_date, parse_time};

pub fn update_form_field(field: &str, value: &str) -> ToolReply {
    if field.trim().is_empty() {
        return ToolReply::failed(
            "I couldn't tell which form field to update. Try something like 'change the sentiment to positive'.",
        );
    }

    let key = normalize_field(field);
    let normalized = match FormField::from_key(&key) {
        Some(FormField::Date) => parse_date(value).format("%Y-%m-%d").to_string(),
        Some(FormField::Time) => parse_time(value),
        _ => normalize_value(&key, value.trim()),
    };

    tracing::debug!(field = %key, value = %normalized, "form field update");
    ToolReply::FormUpdate {
        message: format!("Updated {} to '{}'.", key, normalized),
        update: FieldUpdate {
            field: key,
            value: normalized,
        },
    }
}

pub fn form_information(form: &HashMap<String, String>) -> ToolReply {
    let filled: Vec<(FormField, &str)> = FormField::all()
        .into_iter()
        .filter_map(|field| {
            form.get(field.as_str())
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(|v| (field, v))
        })
        .collect();

    if filled.is_empty() {
        return ToolReply::Conversation {
            message: "The form is currently empty. Describe an interaction and I'll fill it in for you.".to_string(),
        };
    }

    let mut body = String::from("Current form contents:\n");
    for (field, value) in &filled {
        body.push_str(&format!("- {}: {}\n", field, value));
    }

    let missing: Vec<&str> = FormField::required()
        .into_iter()
        .filter(|field| !filled.iter().any(|(f, _)| f == field))
        .map(|field| field.as_str())
        .collect();

    if missing.is_empty() {
        body.push_str("\nAll required fields are filled. The form is ready to submit.");
    } else {
        body.push_str(&format!(
            "\nStill needed before submission: {}.",
            missing.join(", ")
        ));
    }

    ToolReply::Report { body }
}
