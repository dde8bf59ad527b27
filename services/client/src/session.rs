//! services/client/src/session.rs
//!
//! The session/identity service: in-memory session state, rehydration from
//! durable storage at startup, and the teardown lifecycle shared by logout
//! and the transport layer's 401 handling.

use std::sync::{Arc, RwLock};

use petro_repo_core::domain::{PersistedSession, Session, User};
use petro_repo_core::ports::{PortResult, SessionStorage};
use tracing::{info, warn};

/// Shared handle to the current session.
///
/// Clones share one underlying state. Every outgoing request reads the
/// token through a single lock acquisition, so a call never fires with a
/// partially-updated session.
#[derive(Clone)]
pub struct SessionHandle {
    current: Arc<RwLock<Session>>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionHandle {
    /// Starts from durable storage, trusting a persisted session
    /// optimistically. No server round-trip happens here; the first API
    /// call to reject the token tears the session down instead.
    pub fn rehydrate(storage: Arc<dyn SessionStorage>) -> Self {
        let session = match storage.load() {
            Ok(Some(persisted)) => {
                info!("Rehydrated session for {}", persisted.user.email);
                Session::authenticated(persisted.user, persisted.token)
            }
            Ok(None) => Session::anonymous(),
            Err(error) => {
                warn!("Ignoring unreadable persisted session: {error}");
                Session::anonymous()
            }
        };
        Self {
            current: Arc::new(RwLock::new(session)),
            storage,
        }
    }

    /// Atomically replaces the session and persists it. Called only on
    /// login and registration success; a storage failure leaves the prior
    /// session untouched.
    pub fn install(&self, user: User, token: String) -> PortResult<()> {
        let persisted = PersistedSession {
            token: token.clone(),
            user: user.clone(),
        };
        self.storage.save(&persisted)?;
        *self.current.write().expect("session lock poisoned") =
            Session::authenticated(user, token);
        Ok(())
    }

    /// Clears both in-memory and persisted state. A failure to clear
    /// storage is logged and never blocks the teardown.
    pub fn teardown(&self) {
        if let Err(error) = self.storage.clear() {
            warn!("Failed to clear persisted session: {error}");
        }
        *self.current.write().expect("session lock poisoned") = Session::anonymous();
    }

    /// A point-in-time copy of the session for predicates and display.
    pub fn snapshot(&self) -> Session {
        self.current.read().expect("session lock poisoned").clone()
    }

    pub fn token(&self) -> Option<String> {
        self.current
            .read()
            .expect("session lock poisoned")
            .token
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current
            .read()
            .expect("session lock poisoned")
            .is_authenticated()
    }
}
