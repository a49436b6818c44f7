pub mod audio;
pub mod auth;

use crate::interface_adapters::protocol::{ErrorResponse, HealthResponse};
use axum::{Json, http::StatusCode};

const SERVICE_NAME: &str = "AudioFlow API";

// Liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
    })
}

// Helper to build a JSON error response.
pub(crate) fn error_response(
    status: StatusCode,
    message: &str,
) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            message: message.to_string(),
        }),
    )
}
