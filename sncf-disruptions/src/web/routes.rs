//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tracing::warn;

use crate::sensor::SensorSnapshot;

use super::dto::ErrorResponse;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/sensor", get(sensor))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Latest sensor snapshot.
async fn sensor(State(state): State<AppState>) -> Result<Json<SensorSnapshot>, AppError> {
    let snapshot = state.snapshot();
    if snapshot.state.is_none() {
        return Err(AppError::NotReady);
    }
    Ok(Json(snapshot))
}

#[derive(Debug)]
pub enum AppError {
    /// The sensor has not completed its first update.
    NotReady,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::NotReady => (
                StatusCode::SERVICE_UNAVAILABLE,
                "sensor has not been updated yet".to_string(),
            ),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
