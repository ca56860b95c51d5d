//! Health Check API Handlers

use std::sync::Arc;

use axum::{extract::State, response::Json};
use common::SuccessResponse;
use tracing::warn;

use super::dto::HealthStatus;
use crate::app_state::AppState;

/// Service liveness plus database reachability
///
/// @route GET /health (public)
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<SuccessResponse<HealthStatus>> {
    let database = match state.sqlite_client.ping().await {
        Ok(()) => "connected",
        Err(e) => {
            warn!("Health check: database unreachable: {}", e);
            "unreachable"
        },
    };

    Json(SuccessResponse::new(HealthStatus {
        status: "healthy".to_string(),
        service: "tracesrv".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    }))
}
