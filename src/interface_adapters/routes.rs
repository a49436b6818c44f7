use crate::interface_adapters::handlers::audio::stream_audio;
use crate::interface_adapters::handlers::auth::{logout, telegram_login, verify_token};
use crate::interface_adapters::handlers::health;
use crate::interface_adapters::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn app(state: AppState) -> Router {
    // Wire the HTTP routes to their handlers.
    Router::new()
        .route("/health", get(health))
        .route("/api/auth/telegram", post(telegram_login))
        .route("/api/auth/verify-token", post(verify_token))
        .route("/api/auth/logout", post(logout))
        .route("/api/audio/{file_name}", get(stream_audio))
        .with_state(state)
}
