use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use thiserror::Error;

use crate::use_cases::MalformedRangePolicy;

// Runtime/server defaults.
pub const DEFAULT_HTTP_PORT: u16 = 8000;
pub const DEFAULT_INIT_DATA_MAX_AGE_SECONDS: u64 = 24 * 60 * 60;
pub const DEFAULT_SESSION_TTL_SECONDS: u64 = 7 * 24 * 60 * 60;
pub const DEFAULT_AUDIO_DIR: &str = "./static/uploads/audio";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Service configuration, read once at startup and passed down explicitly.
#[derive(Clone)]
pub struct Settings {
    pub host: IpAddr,
    pub port: u16,
    pub bot_token: String,
    pub init_data_max_age_seconds: u64,
    pub session_ttl_seconds: u64,
    pub audio_dir: PathBuf,
    pub malformed_range: MalformedRangePolicy,
    pub database_url: Option<String>,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("bot_token", &"<redacted>")
            .field("init_data_max_age_seconds", &self.init_data_max_age_seconds)
            .field("session_ttl_seconds", &self.session_ttl_seconds)
            .field("audio_dir", &self.audio_dir)
            .field("malformed_range", &self.malformed_range)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .finish()
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds settings from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let bot_token = get("BOT_TOKEN").ok_or(ConfigError::Missing("BOT_TOKEN"))?;

        let fallback_full = parse_or(
            "RANGE_FALLBACK_FULL",
            get("RANGE_FALLBACK_FULL"),
            false,
            parse_flag,
        )?;
        let malformed_range = if fallback_full {
            MalformedRangePolicy::ServeFull
        } else {
            MalformedRangePolicy::Reject
        };

        Ok(Self {
            host: parse_or(
                "HTTP_HOST",
                get("HTTP_HOST"),
                IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                |v| v.parse().ok(),
            )?,
            port: parse_or("HTTP_PORT", get("HTTP_PORT"), DEFAULT_HTTP_PORT, |v| {
                v.parse().ok()
            })?,
            bot_token,
            init_data_max_age_seconds: parse_or(
                "INIT_DATA_MAX_AGE_SECONDS",
                get("INIT_DATA_MAX_AGE_SECONDS"),
                DEFAULT_INIT_DATA_MAX_AGE_SECONDS,
                |v| v.parse().ok(),
            )?,
            session_ttl_seconds: parse_or(
                "SESSION_TTL_SECONDS",
                get("SESSION_TTL_SECONDS"),
                DEFAULT_SESSION_TTL_SECONDS,
                |v| v.parse().ok(),
            )?,
            audio_dir: get("AUDIO_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_AUDIO_DIR)),
            malformed_range,
            database_url: get("DATABASE_URL"),
        })
    }
}

fn parse_or<T>(
    name: &'static str,
    value: Option<String>,
    default: T,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => parse(value.trim()).ok_or(ConfigError::Invalid { name, value }),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
