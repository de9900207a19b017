use super::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use serde_json::Value;
use tracing::error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// POST /analyze
/// Relay an arbitrary JSON body to the backend's `/analyze` path and pass
/// its response through unchanged. Opaque passthrough: no schema
/// validation on either side. Any failure collapses to a generic error
/// object.
pub async fn analyze(State(state): State<AppState>, Json(body): Json<Value>) -> impl IntoResponse {
    match relay(&state, &body).await {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(e) => {
            error!("analyze relay failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Error calling backend".to_string(),
                }),
            )
                .into_response()
        }
    }
}

async fn relay(state: &AppState, body: &Value) -> Result<Value, reqwest::Error> {
    let url = format!(
        "{}/analyze",
        state.backend_base_url.trim_end_matches('/')
    );

    let response = state
        .client
        .post(&url)
        .json(body)
        .send()
        .await?
        .error_for_status()?;

    response.json().await
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
