use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

use crate::domain::entities::{Session, VerifiedIdentity};
use crate::domain::init_data::InitDataVerifier;
use crate::domain::ports::{Clock, SessionStore, UserStore};
use crate::use_cases::StreamAudioUseCase;

// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<Mutex<HashMap<String, Session>>>,
    // We use Arc<dyn Trait> so the backing store is picked at startup.
    pub users: Arc<dyn UserStore>,
    pub verifier: InitDataVerifier,
    pub session_ttl_seconds: u64,
    // Root directory the audio route resolves file names against.
    pub audio_dir: Arc<PathBuf>,
    pub stream: StreamAudioUseCase,
}

// In-memory session store adapter.
#[derive(Clone)]
pub struct InMemorySessionStore {
    pub sessions: Arc<Mutex<HashMap<String, Session>>>,
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, token: String, session: Session) -> Result<(), String> {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(token, session);
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<Session>, String> {
        let sessions = self.sessions.lock().await;
        Ok(sessions.get(token).cloned())
    }

    async fn remove(&self, token: &str) -> Result<bool, String> {
        let mut sessions = self.sessions.lock().await;
        Ok(sessions.remove(token).is_some())
    }

    async fn purge_expired(&self, now: u64) -> Result<usize, String> {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.expires_at > now);
        Ok(before - sessions.len())
    }
}

// PostgreSQL-backed store for Telegram users.
#[derive(Clone)]
pub struct PostgresUserStore {
    pub db: PgPool,
}

#[async_trait]
impl UserStore for PostgresUserStore {
    // Upsert the user record using the latest identity data.
    async fn upsert(&self, identity: &VerifiedIdentity) -> Result<(), String> {
        sqlx::query(
            r#"
            INSERT INTO telegram_users (telegram_id, username, first_name, last_name, language_code)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (telegram_id) DO UPDATE SET
                username = EXCLUDED.username,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                language_code = EXCLUDED.language_code,
                updated_at = now()
            "#,
        )
        .bind(identity.id)
        .bind(identity.username.as_deref())
        .bind(identity.first_name.as_deref())
        .bind(identity.last_name.as_deref())
        .bind(identity.language_code.as_deref())
        .execute(&self.db)
        .await
        .map_err(|err| err.to_string())?;

        Ok(())
    }
}

// Fallback user store when no database is configured.
#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    pub users: Arc<Mutex<HashMap<i64, VerifiedIdentity>>>,
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn upsert(&self, identity: &VerifiedIdentity) -> Result<(), String> {
        let mut users = self.users.lock().await;
        users.insert(identity.id, identity.clone());
        Ok(())
    }
}

// System clock adapter used by auth use cases.
#[derive(Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}
