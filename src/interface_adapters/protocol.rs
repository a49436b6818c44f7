use serde::{Deserialize, Serialize};

use crate::domain::entities::VerifiedIdentity;

// Request payload for Telegram login; the field name matches the Web App SDK.
#[derive(Debug, Deserialize)]
pub struct TelegramAuthRequest {
    #[serde(rename = "initData")]
    pub init_data: String,
}

// Response payload for Telegram login.
#[derive(Debug, Serialize)]
pub struct TelegramAuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: u64,
    pub user: TelegramUserResponse,
}

#[derive(Debug, Serialize)]
pub struct TelegramUserResponse {
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub language_code: Option<String>,
    pub is_premium: bool,
}

impl From<VerifiedIdentity> for TelegramUserResponse {
    fn from(identity: VerifiedIdentity) -> Self {
        Self {
            telegram_id: identity.id,
            username: identity.username,
            first_name: identity.first_name,
            last_name: identity.last_name,
            language_code: identity.language_code,
            is_premium: identity.is_premium,
        }
    }
}

// Request payload for token verification.
#[derive(Debug, Deserialize)]
pub struct VerifyTokenRequest {
    pub token: String,
}

// Response payload for token verification.
#[derive(Debug, Serialize)]
pub struct VerifyTokenResponse {
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub session_id: String,
    pub expires_at: u64,
}

// Request payload for logout.
#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub token: String,
}

// Response payload for logout.
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub revoked: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

// Simple error envelope for JSON responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}
