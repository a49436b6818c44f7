use crate::domain::errors::AuthError;
use crate::interface_adapters::handlers::error_response;
use crate::interface_adapters::protocol::{
    ErrorResponse, LogoutRequest, LogoutResponse, TelegramAuthRequest, TelegramAuthResponse,
    VerifyTokenRequest, VerifyTokenResponse,
};
use crate::interface_adapters::state::{AppState, InMemorySessionStore, SystemClock};
use crate::use_cases::{LogoutUseCase, TelegramLoginUseCase, VerifyTokenUseCase};
use axum::{Json, extract::State, http::StatusCode};
use tracing::{info, warn};

const TOKEN_TYPE: &str = "bearer";

// Handler for exchanging Telegram init-data for a session token.
#[tracing::instrument(name = "telegram_login", skip_all)]
pub async fn telegram_login(
    State(state): State<AppState>,
    Json(payload): Json<TelegramAuthRequest>,
) -> Result<Json<TelegramAuthResponse>, (StatusCode, Json<ErrorResponse>)> {
    let use_case = TelegramLoginUseCase {
        clock: SystemClock,
        store: InMemorySessionStore {
            sessions: state.sessions.clone(),
        },
        users: state.users.clone(),
        verifier: state.verifier.clone(),
        ttl_seconds: state.session_ttl_seconds,
    };

    let result = use_case
        .execute(&payload.init_data)
        .await
        .map_err(|err| map_auth_error(err, AuthErrorContext::TelegramLogin))?;

    info!(telegram_id = result.identity.id, "telegram login succeeded");

    Ok(Json(TelegramAuthResponse {
        access_token: result.token,
        token_type: TOKEN_TYPE.to_string(),
        expires_at: result.expires_at,
        user: result.identity.into(),
    }))
}

// Handler for verifying a session token.
pub async fn verify_token(
    State(state): State<AppState>,
    Json(payload): Json<VerifyTokenRequest>,
) -> Result<Json<VerifyTokenResponse>, (StatusCode, Json<ErrorResponse>)> {
    let use_case = VerifyTokenUseCase {
        clock: SystemClock,
        store: InMemorySessionStore {
            sessions: state.sessions.clone(),
        },
    };

    let result = use_case
        .execute(payload.token)
        .await
        .map_err(|err| map_auth_error(err, AuthErrorContext::VerifyToken))?;

    Ok(Json(VerifyTokenResponse {
        telegram_id: result.telegram_id,
        username: result.username,
        first_name: result.first_name,
        session_id: result.session_id,
        expires_at: result.expires_at,
    }))
}

// Handler for revoking a session token.
pub async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<LogoutRequest>,
) -> Result<Json<LogoutResponse>, (StatusCode, Json<ErrorResponse>)> {
    let use_case = LogoutUseCase {
        store: InMemorySessionStore {
            sessions: state.sessions.clone(),
        },
    };

    let result = use_case
        .execute(payload.token)
        .await
        .map_err(|err| map_auth_error(err, AuthErrorContext::Logout))?;

    Ok(Json(LogoutResponse {
        revoked: result.revoked,
    }))
}

// Maps domain errors to HTTP responses by endpoint context.
enum AuthErrorContext {
    TelegramLogin,
    VerifyToken,
    Logout,
}

fn map_auth_error(err: AuthError, context: AuthErrorContext) -> (StatusCode, Json<ErrorResponse>) {
    match context {
        AuthErrorContext::TelegramLogin => match err {
            AuthError::StorageFailure => error_response(StatusCode::BAD_GATEWAY, "storage error"),
            // Clients only learn that authentication failed; the kind stays in logs.
            AuthError::MalformedPayload
            | AuthError::MissingSignature
            | AuthError::SignatureMismatch
            | AuthError::StalePayload
            | AuthError::MissingUserId
            | AuthError::InvalidToken
            | AuthError::SessionExpired => {
                warn!(reason = %err, "telegram init data rejected");
                error_response(StatusCode::UNAUTHORIZED, "invalid authentication data")
            }
        },
        AuthErrorContext::VerifyToken => match err {
            AuthError::SessionExpired => {
                error_response(StatusCode::UNAUTHORIZED, "session expired")
            }
            AuthError::StorageFailure => error_response(StatusCode::BAD_GATEWAY, "storage error"),
            AuthError::InvalidToken
            | AuthError::MalformedPayload
            | AuthError::MissingSignature
            | AuthError::SignatureMismatch
            | AuthError::StalePayload
            | AuthError::MissingUserId => {
                error_response(StatusCode::UNAUTHORIZED, "invalid session token")
            }
        },
        AuthErrorContext::Logout => match err {
            AuthError::StorageFailure => error_response(StatusCode::BAD_GATEWAY, "storage error"),
            _ => error_response(StatusCode::BAD_REQUEST, "invalid token"),
        },
    }
}
