use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::models::{CardSequence, RefreshResponse};
use crate::service::server::state::AppState;

pub const LIVENESS_TEXT: &str = "Earnings board is running";

/// Build the dashboard router.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(liveness))
        .route("/health", get(health))
        .route("/api/earnings", get(get_earnings))
        .route("/api/refresh", get(refresh))
}

/// GET / - plain liveness text.
async fn liveness() -> &'static str {
    LIVENESS_TEXT
}

/// GET /health - provenance and age of the published board.
async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let snap = state.board().snapshot().await;
    Json(json!({
        "status": "ok",
        "source": snap.source,
        "updated_at": snap.updated_at.to_rfc3339(),
        "count": snap.cards.len(),
        "uptime_secs": state.start_time.elapsed().as_secs(),
    }))
}

/// GET /api/earnings - the published board.
async fn get_earnings(State(state): State<Arc<AppState>>) -> Json<CardSequence> {
    let cards = state.board().cards().await;
    Json(cards.as_ref().clone())
}

/// GET /api/refresh - run the pipeline now and report the outcome.
///
/// The refresh runs on its own task so a dropped request cannot stop it
/// between persisting and publishing.
async fn refresh(State(state): State<Arc<AppState>>) -> Json<RefreshResponse> {
    info!("Manual refresh requested");
    let pipeline = Arc::clone(&state.pipeline);
    match tokio::spawn(async move { pipeline.refresh().await }).await {
        Ok(outcome) => Json(outcome.into_response()),
        Err(err) => {
            error!("Refresh task failed: {err}");
            Json(RefreshResponse {
                success: false,
                message: format!("refresh task failed: {err}"),
                count: state.board().card_count().await,
            })
        }
    }
}
