//! HTTP Endpoints
//!
//! REST API for the CRM assistant: the chat endpoint, interaction CRUD
//! used by the form frontend, and operational endpoints.

use std::collections::HashMap;
use std::time::Instant;

use axum::{
    extract::{Json, Path, State},
    http::{HeaderValue, Method, StatusCode},
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use hcp_crm_core::{
    AgentResponse, InteractionDraft, InteractionRecord, InteractionStore, InteractionUpdate,
};
use hcp_crm_nlp::{parse_date, parse_time};

use crate::metrics::{metrics_handler, record_chat_latency, record_request};
use crate::state::AppState;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(
        &state.settings.server.cors_origins,
        state.settings.server.cors_enabled,
    );

    Router::new()
        // Chat endpoint
        .route("/api/chat", post(chat))
        // Interaction CRUD used by the form frontend
        .route("/api/interactions/log", post(log_interaction))
        .route("/api/interactions/:id", put(update_interaction))
        .route("/api/interactions/hcp/:name", get(interactions_for_hcp))
        // Health checks
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        // Prometheus metrics
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, returns permissive layer (for dev)
/// - If cors_origins is empty, defaults to localhost:3000 for safety
/// - Otherwise, uses the configured origins
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    if parsed_origins.is_empty() {
        tracing::info!("No CORS origins configured, defaulting to localhost:3000");
        return CorsLayer::new()
            .allow_origin(HeaderValue::from_static("http://localhost:3000"))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
            .allow_headers(Any);
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(Any)
        .allow_credentials(true)
}

/// Chat request
#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
    /// Current form snapshot, canonical keys to values.
    #[serde(default)]
    form: HashMap<String, String>,
}

/// Chat endpoint
async fn chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> Json<AgentResponse> {
    let started = Instant::now();
    let response = state.agent.handle(&request.message, request.form).await;

    let response_type = match &response {
        AgentResponse::FormPopulate { .. } => "form_populate",
        AgentResponse::FormUpdate { .. } => "form_update",
        AgentResponse::Message { .. } => "message",
    };
    record_request(response_type);
    record_chat_latency(started.elapsed());

    Json(response)
}

/// Interaction payload sent by the form frontend. Keys mirror the
/// canonical form field names.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InteractionForm {
    #[serde(default)]
    hcp_name: Option<String>,
    #[serde(default)]
    interaction_type: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    time: Option<String>,
    #[serde(default)]
    attendees: Option<String>,
    #[serde(default)]
    topics_discussed: Option<String>,
    #[serde(default)]
    materials_shared: Option<String>,
    #[serde(default)]
    samples_distributed: Option<String>,
    #[serde(default)]
    hcp_sentiment: Option<String>,
    #[serde(default)]
    outcomes: Option<String>,
    #[serde(default)]
    follow_up_actions: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn error_body(message: impl Into<String>) -> Json<ErrorBody> {
    Json(ErrorBody {
        error: message.into(),
    })
}

/// Persist a submitted form as a new interaction record.
async fn log_interaction(
    State(state): State<AppState>,
    Json(form): Json<InteractionForm>,
) -> Result<(StatusCode, Json<InteractionRecord>), (StatusCode, Json<ErrorBody>)> {
    let hcp_name = form.hcp_name.as_deref().unwrap_or("").trim().to_string();
    if hcp_name.is_empty() {
        return Err((StatusCode::BAD_REQUEST, error_body("hcpName is required")));
    }

    let draft = InteractionDraft {
        hcp_name,
        interaction_date: parse_date(form.date.as_deref().unwrap_or("today")),
        interaction_time: form.time.as_deref().map(parse_time).unwrap_or_default(),
        interaction_type: form.interaction_type.unwrap_or_default(),
        attendees: form.attendees.unwrap_or_default(),
        summary: form.outcomes.unwrap_or_default(),
        key_discussion_points: form.topics_discussed.unwrap_or_default(),
        materials_shared: form.materials_shared.unwrap_or_default(),
        samples_distributed: form.samples_distributed.unwrap_or_default(),
        sentiment: form.hcp_sentiment.unwrap_or_default(),
        follow_up_actions: form.follow_up_actions.unwrap_or_default(),
    };

    match state.store.insert(draft).await {
        Ok(record) => {
            record_request("log_submitted");
            Ok((StatusCode::CREATED, Json(record)))
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to insert interaction");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("failed to store interaction"),
            ))
        }
    }
}

/// Apply a partial update to a stored interaction.
async fn update_interaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<InteractionForm>,
) -> Result<Json<InteractionRecord>, (StatusCode, Json<ErrorBody>)> {
    let update = InteractionUpdate {
        hcp_name: form.hcp_name.filter(|v| !v.trim().is_empty()),
        interaction_date: form.date.as_deref().map(parse_date),
        interaction_time: form.time.as_deref().map(parse_time),
        interaction_type: form.interaction_type,
        attendees: form.attendees,
        summary: form.outcomes,
        key_discussion_points: form.topics_discussed,
        materials_shared: form.materials_shared,
        samples_distributed: form.samples_distributed,
        sentiment: form.hcp_sentiment,
        follow_up_actions: form.follow_up_actions,
    };

    if update.is_empty() {
        return Err((StatusCode::BAD_REQUEST, error_body("no fields to update")));
    }

    match state.store.update(id, update).await {
        Ok(record) => Ok(Json(record)),
        Err(e) if e.to_string().contains("not found") => Err((
            StatusCode::NOT_FOUND,
            error_body(format!("no interaction with id {}", id)),
        )),
        Err(e) => {
            tracing::error!(error = %e, "failed to update interaction");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("failed to update interaction"),
            ))
        }
    }
}

/// List stored interactions for an HCP, newest first.
async fn interactions_for_hcp(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorBody>)> {
    match state.store.find_by_name_substring(&name).await {
        Ok(records) => Ok(Json(serde_json::json!({
            "hcp_name": name,
            "count": records.len(),
            "interactions": records,
        }))),
        Err(e) => {
            tracing::error!(error = %e, "failed to list interactions");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("failed to list interactions"),
            ))
        }
    }
}

/// Liveness: process is up and storage is reachable.
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "interactions": state.store.len(),
    }))
}

/// Readiness: completion backend reachable within a short timeout.
async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<serde_json::Value>) {
    let llm_url = format!(
        "{}/models",
        state.settings.llm.endpoint.trim_end_matches('/')
    );

    let mut ready = true;
    let llm_status =
        match tokio::time::timeout(std::time::Duration::from_secs(2), reqwest::get(&llm_url)).await
        {
            Ok(Ok(resp)) if resp.status().is_success() || resp.status() == StatusCode::UNAUTHORIZED => {
                // 401 still proves the backend is reachable; the API key
                // is attached per-request by the completion client.
                "ok"
            }
            Ok(Ok(_)) => {
                ready = false;
                "error"
            }
            Ok(Err(_)) => {
                ready = false;
                "unreachable"
            }
            Err(_) => {
                ready = false;
                "timeout"
            }
        };

    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(serde_json::json!({
            "status": if ready { "ready" } else { "not_ready" },
            "checks": {
                "llm_backend": { "status": llm_status, "url": llm_url },
                "storage": { "status": "ok", "interactions": state.store.len() },
            }
        })),
    )
}
