//! API routes for verad.
//!
//! The ask endpoint is the whole product surface: one question in, one
//! answer string out. Refusals are policy outcomes and come back as
//! 200s; only a blank question is a caller error.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use vera_common::REFUSAL;

use crate::server::AppState;

type AppStateArc = Arc<AppState>;

// ============================================================================
// Ask Routes
// ============================================================================

/// Request to answer a question about a member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// The answer, or the fixed refusal literal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

pub fn ask_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/ask", post(ask))
}

async fn ask(
    State(state): State<AppStateArc>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, (StatusCode, String)> {
    let question = req.question.trim();
    if question.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Field 'question' must not be empty".to_string(),
        ));
    }

    info!("[Q]  {}", question);

    // No corpus yet: refuse every question rather than erroring, so
    // callers see one uniform no-evidence contract.
    let Some(engine) = state.current_engine().await else {
        debug!("corpus not loaded; refusing");
        return Ok(Json(AskResponse {
            answer: REFUSAL.to_string(),
        }));
    };

    let answer = engine.ask(question);
    debug!(refused = answer.is_refusal(), "[A]  answered");

    Ok(Json(AskResponse {
        answer: answer.render(),
    }))
}

// ============================================================================
// Health Routes
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    /// Whether a corpus snapshot has been loaded; the transport layer
    /// may decline to route /v1/ask until this is true.
    pub corpus_loaded: bool,
    pub member_count: usize,
    pub message_count: usize,
}

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/health", get(health_check))
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    let engine = state.current_engine().await;

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        corpus_loaded: engine.is_some(),
        member_count: engine.as_ref().map(|e| e.member_count()).unwrap_or(0),
        message_count: engine.as_ref().map(|e| e.message_count()).unwrap_or(0),
    })
}
