use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use crate::routes::AppState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub checked_at: String,
}

/// Liveness only: the pipeline holds no connections or state to probe,
/// so a served response is the health signal.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ready",
        service: HealthCheck {
            status: "ready",
            detail: format!("reply pipeline serving model `{}`", state.model),
        },
        checked_at: Utc::now().to_rfc3339(),
    })
}
