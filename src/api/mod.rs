//! HTTP surface receiving enrichment work items

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::connector::Connector;

/// Application state shared across handlers
pub struct AppState {
    pub config: Arc<Config>,
    // One work item is processed to completion before the next is accepted.
    pub connector: Mutex<Connector>,
}

/// One inbound work item
#[derive(Debug, Deserialize)]
pub struct EnrichRequest {
    pub entity_id: String,
}

#[derive(Debug, Serialize)]
pub struct EnrichResponse {
    pub status: Option<String>,
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/enrich", post(enrich))
        .with_state(state)
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "censys-connector",
        "version": env!("CARGO_PKG_VERSION"),
        "scope": state.config.connector_scope,
    }))
}

/// Handle one work item. Failures are logged and reported as a null status;
/// the message is considered handled either way, so the caller never retries.
async fn enrich(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EnrichRequest>,
) -> Json<EnrichResponse> {
    let connector = state.connector.lock().await;

    match connector.process_message(&req.entity_id).await {
        Ok(status) => Json(EnrichResponse { status }),
        Err(e) => {
            tracing::error!(entity_id = %req.entity_id, error = %e, "Message handling failed");
            Json(EnrichResponse { status: None })
        }
    }
}
