//! Telegram Web App init-data verification.
//!
//! Telegram signs the `initData` query string it hands to a Mini App with a
//! key derived from the bot token. A payload is authentic when the HMAC of
//! its canonical data-check-string matches the `hash` field it carries.

use std::collections::BTreeMap;
use std::fmt;

use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::domain::entities::VerifiedIdentity;
use crate::domain::errors::AuthError;

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_FIELD: &str = "hash";
const AUTH_DATE_FIELD: &str = "auth_date";
const USER_FIELD: &str = "user";
// HMAC key used to turn a bot token into the init-data signing key.
const SECRET_KEY_LABEL: &[u8] = b"WebAppData";

/// Decoded init-data fields, one value per key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InitData {
    fields: BTreeMap<String, String>,
}

impl InitData {
    /// Decodes a URL-encoded init-data string. Repeated keys keep the last
    /// value.
    pub fn parse(raw: &str) -> Result<Self, AuthError> {
        let fields: BTreeMap<String, String> = url::form_urlencoded::parse(raw.as_bytes())
            .into_owned()
            .collect();

        if fields.is_empty() {
            return Err(AuthError::MalformedPayload);
        }

        Ok(Self { fields })
    }

    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Received signature, if present and non-empty.
    pub fn signature(&self) -> Option<&str> {
        self.get(SIGNATURE_FIELD).filter(|hash| !hash.is_empty())
    }

    /// Canonical form that gets signed: every field except `hash` as
    /// `key=value`, sorted bytewise by the whole line, joined with `\n`.
    pub fn data_check_string(&self) -> String {
        let mut lines: Vec<String> = self
            .fields
            .iter()
            .filter(|(key, _)| key.as_str() != SIGNATURE_FIELD)
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        lines.sort_unstable();
        lines.join("\n")
    }

    /// Lowercase hex signature of this payload under `bot_token`.
    pub fn sign(&self, bot_token: &str) -> String {
        self.signature_with(&derive_secret_key(bot_token))
    }

    /// Returns a copy carrying a fresh `hash` for `bot_token`.
    pub fn signed(mut self, bot_token: &str) -> Self {
        let hash = self.sign(bot_token);
        self.insert(SIGNATURE_FIELD, hash);
        self
    }

    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.fields.iter())
            .finish()
    }

    fn signature_with(&self, secret_key: &[u8; 32]) -> String {
        hex::encode(hmac_sha256(secret_key, self.data_check_string().as_bytes()))
    }
}

/// Derives the init-data signing key for a bot.
///
/// The label is the HMAC key and the bot token is the message. Swapping them
/// produces signatures Telegram never issues.
pub fn derive_secret_key(bot_token: &str) -> [u8; 32] {
    hmac_sha256(SECRET_KEY_LABEL, bot_token.as_bytes())
}

fn hmac_sha256(key: &[u8], message: &[u8]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key size");
    mac.update(message);
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&mac.finalize().into_bytes());
    digest
}

/// Verifies init-data for one bot with a fixed freshness window.
#[derive(Clone)]
pub struct InitDataVerifier {
    secret_key: [u8; 32],
    max_age_seconds: u64,
}

impl fmt::Debug for InitDataVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InitDataVerifier")
            .field("secret_key", &"<redacted>")
            .field("max_age_seconds", &self.max_age_seconds)
            .finish()
    }
}

impl InitDataVerifier {
    pub fn new(bot_token: &str, max_age_seconds: u64) -> Self {
        Self {
            secret_key: derive_secret_key(bot_token),
            max_age_seconds,
        }
    }

    pub fn max_age_seconds(&self) -> u64 {
        self.max_age_seconds
    }

    /// Checks signature, then freshness, then extracts the user.
    ///
    /// `now_epoch_seconds` is the caller's clock; a payload exactly
    /// `max_age_seconds` old is still accepted.
    pub fn verify(
        &self,
        raw_init_data: &str,
        now_epoch_seconds: u64,
    ) -> Result<VerifiedIdentity, AuthError> {
        let init_data = InitData::parse(raw_init_data)?;
        let received = init_data.signature().ok_or(AuthError::MissingSignature)?;

        let calculated = init_data.signature_with(&self.secret_key);
        if !bool::from(calculated.as_bytes().ct_eq(received.as_bytes())) {
            return Err(AuthError::SignatureMismatch);
        }

        let auth_date: i64 = init_data
            .get(AUTH_DATE_FIELD)
            .and_then(|value| value.parse().ok())
            .ok_or(AuthError::MalformedPayload)?;
        let age = i128::from(now_epoch_seconds) - i128::from(auth_date);
        if age > i128::from(self.max_age_seconds) {
            return Err(AuthError::StalePayload);
        }

        let user = init_data.get(USER_FIELD).unwrap_or("{}");
        let Value::Object(user) =
            serde_json::from_str(user).map_err(|_| AuthError::MalformedPayload)?
        else {
            return Err(AuthError::MalformedPayload);
        };

        VerifiedIdentity::from_user_object(user).ok_or(AuthError::MissingUserId)
    }
}

/// One-shot form of [`InitDataVerifier::verify`].
pub fn verify(
    raw_init_data: &str,
    bot_token: &str,
    max_age_seconds: u64,
    now_epoch_seconds: u64,
) -> Result<VerifiedIdentity, AuthError> {
    InitDataVerifier::new(bot_token, max_age_seconds).verify(raw_init_data, now_epoch_seconds)
}
