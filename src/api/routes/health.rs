//! Health check route.

use crate::api::AppState;
use axum::{extract::State, response::Json, routing::get, Router};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub workflow_configured: bool,
}

/// Create the health router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(state)
}

/// GET /health - Service health and workflow readiness.
async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy",
        workflow_configured: state.pipeline.is_workflow_configured(),
    })
}
