use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Session record stored in memory, keyed by its opaque token.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub session_id: String,
    pub expires_at: u64,
}

/// Telegram user extracted from a verified init-data payload.
///
/// `raw` keeps the whole `user` object as Telegram sent it so callers can
/// read fields this type does not model.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VerifiedIdentity {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub language_code: Option<String>,
    pub is_premium: bool,
    pub photo_url: Option<String>,
    #[serde(skip)]
    pub raw: Map<String, Value>,
}

impl VerifiedIdentity {
    /// Builds an identity from the parsed `user` object.
    ///
    /// Returns `None` when `id` is missing, zero, or not an integer.
    pub fn from_user_object(raw: Map<String, Value>) -> Option<Self> {
        let id = raw.get("id").and_then(Value::as_i64).filter(|id| *id != 0)?;
        let text = |key: &str| raw.get(key).and_then(Value::as_str).map(str::to_owned);

        Some(Self {
            id,
            username: text("username"),
            first_name: text("first_name"),
            last_name: text("last_name"),
            language_code: text("language_code"),
            is_premium: raw
                .get("is_premium")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            photo_url: text("photo_url"),
            raw,
        })
    }
}
