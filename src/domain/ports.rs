use async_trait::async_trait;

use crate::domain::entities::{Session, VerifiedIdentity};

// Port for session storage used by auth use cases.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, token: String, session: Session) -> Result<(), String>;
    async fn get(&self, token: &str) -> Result<Option<Session>, String>;
    async fn remove(&self, token: &str) -> Result<bool, String>;
    // Drops every session with `expires_at <= now`; returns how many went.
    async fn purge_expired(&self, now: u64) -> Result<usize, String>;
}

// Port for persisting the Telegram user behind a successful login.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn upsert(&self, identity: &VerifiedIdentity) -> Result<(), String>;
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now_epoch_seconds(&self) -> u64;
}

// Lets handlers hold the user store as a trait object.
#[async_trait]
impl<T> UserStore for std::sync::Arc<T>
where
    T: UserStore + ?Sized,
{
    async fn upsert(&self, identity: &VerifiedIdentity) -> Result<(), String> {
        (**self).upsert(identity).await
    }
}
