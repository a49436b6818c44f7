use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::entities::{Session, VerifiedIdentity};
use crate::domain::ports::{Clock, SessionStore, UserStore};

pub(crate) type SessionTable = Arc<Mutex<HashMap<String, Session>>>;

// Shared fixed time source for deterministic use-case tests.
pub(crate) struct FixedClock(pub(crate) u64);

impl Clock for FixedClock {
    fn now_epoch_seconds(&self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub insert: bool,
    pub get: bool,
    pub remove: bool,
    pub purge: bool,
}

#[derive(Clone)]
pub(crate) struct RecordingStore {
    sessions: SessionTable,
    failures: FailureFlags,
}

impl RecordingStore {
    pub(crate) fn new() -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            failures: FailureFlags::default(),
        }
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn insert_test_session(&self, token: impl Into<String>, session: Session) {
        let mut guard = self.sessions.lock().expect("sessions mutex poisoned");
        guard.insert(token.into(), session);
    }

    pub(crate) fn get_test_session(&self, token: &str) -> Option<Session> {
        let guard = self.sessions.lock().expect("sessions mutex poisoned");
        guard.get(token).cloned()
    }
}

#[async_trait]
impl SessionStore for RecordingStore {
    async fn insert(&self, token: String, session: Session) -> Result<(), String> {
        if self.failures.insert {
            return Err("insert failed".to_string());
        }

        let mut guard = self.sessions.lock().expect("sessions mutex poisoned");
        guard.insert(token, session);
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<Session>, String> {
        if self.failures.get {
            return Err("get failed".to_string());
        }

        let guard = self.sessions.lock().expect("sessions mutex poisoned");
        Ok(guard.get(token).cloned())
    }

    async fn remove(&self, token: &str) -> Result<bool, String> {
        if self.failures.remove {
            return Err("remove failed".to_string());
        }

        let mut guard = self.sessions.lock().expect("sessions mutex poisoned");
        Ok(guard.remove(token).is_some())
    }

    async fn purge_expired(&self, now: u64) -> Result<usize, String> {
        if self.failures.purge {
            return Err("purge failed".to_string());
        }

        let mut guard = self.sessions.lock().expect("sessions mutex poisoned");
        let before = guard.len();
        guard.retain(|_, session| session.expires_at > now);
        Ok(before - guard.len())
    }
}

// Captures upserted users; can be told to fail every call.
#[derive(Clone, Default)]
pub(crate) struct RecordingUserStore {
    users: Arc<Mutex<Vec<VerifiedIdentity>>>,
    fail: bool,
}

impl RecordingUserStore {
    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub(crate) fn upserted(&self) -> Vec<VerifiedIdentity> {
        self.users.lock().expect("users mutex poisoned").clone()
    }
}

#[async_trait]
impl UserStore for RecordingUserStore {
    async fn upsert(&self, identity: &VerifiedIdentity) -> Result<(), String> {
        if self.fail {
            return Err("upsert failed".to_string());
        }

        self.users
            .lock()
            .expect("users mutex poisoned")
            .push(identity.clone());
        Ok(())
    }
}

pub(crate) fn test_session(telegram_id: i64, expires_at: u64) -> Session {
    Session {
        telegram_id,
        username: Some("vdkfrost".to_string()),
        first_name: Some("Vladislav".to_string()),
        session_id: "session-1".to_string(),
        expires_at,
    }
}
