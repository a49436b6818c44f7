use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::entities::{Session, VerifiedIdentity};
use crate::domain::errors::AuthError;
use crate::domain::init_data::InitDataVerifier;
use crate::domain::ports::{Clock, SessionStore, UserStore};

// Response returned by the Telegram login use case.
pub struct TelegramLoginResponse {
    pub token: String,
    pub expires_at: u64,
    pub identity: VerifiedIdentity,
}

// Telegram login use case with injected dependencies.
pub struct TelegramLoginUseCase<C, S, U> {
    pub clock: C,
    pub store: S,
    pub users: U,
    pub verifier: InitDataVerifier,
    pub ttl_seconds: u64,
}

impl<C, S, U> TelegramLoginUseCase<C, S, U>
where
    C: Clock,
    S: SessionStore,
    U: UserStore,
{
    pub async fn execute(&self, init_data: &str) -> Result<TelegramLoginResponse, AuthError> {
        let now = self.clock.now_epoch_seconds();
        let identity = self.verifier.verify(init_data, now)?;

        // Best-effort persistence of the user record for the catalog side.
        if let Err(err) = self.users.upsert(&identity).await {
            warn!(telegram_id = identity.id, error = %err, "failed to upsert telegram user");
        }

        // Abandoned tokens are never re-verified, so sweep them on every login.
        match self.store.purge_expired(now).await {
            Ok(0) => {}
            Ok(purged) => debug!(purged, "dropped expired sessions"),
            Err(err) => warn!(error = %err, "failed to purge expired sessions"),
        }

        let token = Uuid::new_v4().to_string();
        let expires_at = now + self.ttl_seconds;
        let session = Session {
            telegram_id: identity.id,
            username: identity.username.clone(),
            first_name: identity.first_name.clone(),
            session_id: Uuid::new_v4().to_string(),
            expires_at,
        };

        self.store
            .insert(token.clone(), session)
            .await
            .map_err(|_| AuthError::StorageFailure)?;

        Ok(TelegramLoginResponse {
            token,
            expires_at,
            identity,
        })
    }
}
