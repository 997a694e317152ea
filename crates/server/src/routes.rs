use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use replyline_agent::AgentRuntime;
use replyline_core::{InterfaceError, PipelineError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use uuid::Uuid;

use crate::health;

#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<AgentRuntime>,
    pub model: String,
}

#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    /// Prior turns as loosely-typed `{role, content}` records; the
    /// pipeline normalizes and bounds them, so anything is accepted.
    #[serde(default)]
    pub history: Vec<Value>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct RespondResponse {
    pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub correlation_id: String,
}

pub fn router(runtime: Arc<AgentRuntime>, model: String, cors_permissive: bool) -> Router {
    let mut router = Router::new()
        .route("/respond", post(respond))
        .route("/health", get(health::health))
        .with_state(AppState { runtime, model });

    if cors_permissive {
        router = router.layer(CorsLayer::permissive());
    }
    router
}

async fn respond(
    State(state): State<AppState>,
    Json(request): Json<RespondRequest>,
) -> Result<Json<RespondResponse>, (StatusCode, Json<ErrorResponse>)> {
    let correlation_id = Uuid::new_v4().to_string();

    match state.runtime.respond(&request.history, &request.message).await {
        Ok(reply) => {
            info!(
                event_name = "pipeline.respond.completed",
                correlation_id = %correlation_id,
                history_len = request.history.len(),
                "reply generated"
            );
            Ok(Json(RespondResponse { reply }))
        }
        Err(error) => Err(error_response(error, correlation_id)),
    }
}

fn error_response(
    error: PipelineError,
    correlation_id: String,
) -> (StatusCode, Json<ErrorResponse>) {
    let interface = error.into_interface(correlation_id);
    warn!(
        event_name = "pipeline.respond.failed",
        correlation_id = %interface.correlation_id(),
        error = %interface,
        "reply pipeline failed"
    );

    let status = match &interface {
        InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        InterfaceError::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
        InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let body = ErrorResponse {
        error: interface.user_message().to_owned(),
        correlation_id: interface.correlation_id().to_owned(),
    };
    (status, Json(body))
}
