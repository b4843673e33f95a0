//! Sales insights narrative
//!
//! Aggregates an HCP's recent interactions and asks the completion model
//! for a sectioned analysis. When the model path fails the narrative is
//! assembled locally from the same aggregates, so the tool always answers.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::Value;

use hcp_crm_core::{CompletionModel, InteractionRecord, InteractionStore, ToolReply};
use hcp_crm_nlp::extract_json_block;

use crate::search::find_interactions;

/// Section keys requested from the model, with their display headings.
const SECTIONS: [(&str, &str); 6] = [
    ("engagement_summary", "Engagement Summary"),
    ("sentiment_analysis", "Sentiment Analysis"),
    ("top_opportunities", "Top Opportunities"),
    ("relationship_trends", "Relationship Trends"),
    ("strategic_recommendations", "Strategic Recommendations"),
    ("success_metrics", "Success Metrics"),
];

/// Recent summaries included in the analysis prompt.
const PROMPT_SUMMARIES: usize = 5;

pub async fn generate_sales_insights(
    store: &Arc<dyn InteractionStore>,
    model: &Arc<dyn CompletionModel>,
    search: &str,
    period_days: i64,
) -> ToolReply {
    // An empty search analyzes every record: whole-pipeline insights.
    let target = search.trim();
    let display = if target.is_empty() {
        "Overall Sales Pipeline"
    } else {
        target
    };

    let matches = match find_interactions(store, target).await {
        Ok(matches) => matches,
        Err(e) => {
            tracing::error!(error = %e, "insights lookup failed");
            return ToolReply::failed(
                "Something went wrong while accessing interaction records. Please try again.",
            );
        }
    };

    let cutoff = Utc::now().date_naive() - Duration::days(period_days);
    let recent: Vec<&InteractionRecord> = matches
        .iter()
        .filter(|r| r.interaction_date >= cutoff)
        .collect();

    if recent.is_empty() {
        return ToolReply::not_found(format!(
            "No interactions found for {} in the last {} days.",
            if target.is_empty() { "your sales activities" } else { target },
            period_days
        ));
    }

    let stats = Aggregates::compute(&recent);
    let heading = format!(
        "Sales Insights for {} (last {} days, {} interaction{})",
        display,
        period_days,
        recent.len(),
        if recent.len() == 1 { "" } else { "s" }
    );

    let sections = match model.complete(&insights_prompt(display, &stats, &recent)).await {
        Ok(response) => parse_sections(&response).unwrap_or_else(|| {
            tracing::warn!("insights response was not valid JSON, using local analysis");
            local_sections(&stats)
        }),
        Err(e) => {
            tracing::warn!(error = %e, "insights call failed, using local analysis");
            local_sections(&stats)
        }
    };

    let mut body = heading;
    for (key, title) in SECTIONS {
        if let Some(text) = sections.get(key).filter(|t| !t.trim().is_empty()) {
            body.push_str("\n\n");
            body.push_str(title);
            body.push('\n');
            body.push_str(text.trim());
        }
    }

    ToolReply::Report { body }
}

struct Aggregates {
    total: usize,
    sentiments: BTreeMap<String, usize>,
    types: BTreeMap<String, usize>,
    last_date: String,
}

impl Aggregates {
    fn compute(records: &[&InteractionRecord]) -> Self {
        let mut sentiments = BTreeMap::new();
        let mut types = BTreeMap::new();
        for record in records {
            if !record.sentiment.is_empty() {
                *sentiments.entry(record.sentiment.clone()).or_insert(0) += 1;
            }
            if !record.interaction_type.is_empty() {
                *types.entry(record.interaction_type.clone()).or_insert(0) += 1;
            }
        }
        // Matches arrive newest-first.
        let last_date = records
            .first()
            .map(|r| r.interaction_date.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        Self {
            total: records.len(),
            sentiments,
            types,
            last_date,
        }
    }

    fn counts(map: &BTreeMap<String, usize>) -> String {
        if map.is_empty() {
            return "none recorded".to_string();
        }
        map.iter()
            .map(|(k, v)| format!("{} {}", v, k))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn insights_prompt(search: &str, stats: &Aggregates, recent: &[&InteractionRecord]) -> String {
    let summaries: Vec<String> = recent
        .iter()
        .take(PROMPT_SUMMARIES)
        .map(|r| {
            format!(
                "- {} {}: {}",
                r.interaction_date.format("%Y-%m-%d"),
                r.interaction_type,
                if r.summary.is_empty() { &r.key_discussion_points } else { &r.summary }
            )
        })
        .collect();

    format!(
        r#"You are a pharmaceutical sales analyst. Analyze these interactions for {search} and return ONLY a valid JSON object:

Interactions: {total} total, most recent on {last_date}
Sentiment distribution: {sentiments}
Interaction types: {types}
Recent notes:
{summaries}

{{
    "engagement_summary": "2-3 sentences on engagement frequency and quality",
    "sentiment_analysis": "How sentiment has trended and what drives it",
    "top_opportunities": "Concrete opportunities to pursue next",
    "relationship_trends": "Direction of the relationship",
    "strategic_recommendations": "Specific next actions for the sales rep",
    "success_metrics": "Measurable indicators to track"
}}

Return only the JSON object, no explanations."#,
        search = search.trim(),
        total = stats.total,
        last_date = stats.last_date,
        sentiments = Aggregates::counts(&stats.sentiments),
        types = Aggregates::counts(&stats.types),
        summaries = summaries.join("\n"),
    )
}

fn parse_sections(response: &str) -> Option<BTreeMap<String, String>> {
    let body = extract_json_block(response)?;
    let value: Value = serde_json::from_str(&body).ok()?;
    let obj = value.as_object()?;

    let mut sections = BTreeMap::new();
    for (key, _) in SECTIONS {
        if let Some(text) = obj.get(key).and_then(Value::as_str) {
            sections.insert(key.to_string(), text.to_string());
        }
    }
    if sections.is_empty() {
        None
    } else {
        Some(sections)
    }
}

/// Narrative computed from the aggregates alone.
fn local_sections(stats: &Aggregates) -> BTreeMap<String, String> {
    let positives = stats.sentiments.get("Positive").copied().unwrap_or(0);
    let negatives = stats.sentiments.get("Negative").copied().unwrap_or(0);

    let mut sections = BTreeMap::new();
    sections.insert(
        "engagement_summary".to_string(),
        format!(
            "{} interaction{} in the period, most recently on {}. Interaction types: {}.",
            stats.total,
            if stats.total == 1 { "" } else { "s" },
            stats.last_date,
            Aggregates::counts(&stats.types)
        ),
    );
    sections.insert(
        "sentiment_analysis".to_string(),
        format!("Recorded sentiment: {}.", Aggregates::counts(&stats.sentiments)),
    );
    sections.insert(
        "strategic_recommendations".to_string(),
        if negatives > positives {
            "Recent sentiment skews negative. Prioritize a follow-up conversation to address open concerns before proposing next steps.".to_string()
        } else {
            "Maintain the current cadence and confirm follow-up actions from the most recent interaction.".to_string()
        },
    );
    sections
}
