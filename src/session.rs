//! Session lifecycle.
//! -------------------
//! `Restoring` is the sole initial state; the first `restore` settles it to
//! `Authenticated` or `Anonymous` and the session only moves between those
//! two afterwards. The manager is the only writer of the credential store.
//! A stored token is trusted exclusively on the server's say-so: restore
//! validates it against `/verify-token` and discards it on any failure,
//! transport failures included.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::client::ApiClient;
use crate::models::{SessionToken, UserProfile};
use crate::token_store::TokenStore;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Startup restore still pending.
    Restoring,
    Authenticated(UserProfile),
    Anonymous,
}

pub struct SessionManager {
    client: ApiClient,
    store: Arc<dyn TokenStore>,
    state: RwLock<SessionState>,
    // Serializes restore/sign_in/sign_out, so a transition issued while a
    // restore is in flight commits only after the restore settles.
    transitions: Mutex<()>,
}

impl SessionManager {
    pub fn new(client: ApiClient, store: Arc<dyn TokenStore>) -> Self {
        Self {
            client,
            store,
            state: RwLock::new(SessionState::Restoring),
            transitions: Mutex::new(()),
        }
    }

    /// Validate any stored credential and settle the session. An empty
    /// store settles to `Anonymous` without touching the network. The store
    /// is left as-is only when the server confirms the token; every other
    /// outcome clears it.
    pub async fn restore(&self) {
        let _guard = self.transitions.lock().await;
        if self.store.get().is_none() {
            *self.state.write() = SessionState::Anonymous;
            return;
        }
        match self.client.verify_token().await {
            Ok(resp) if resp.valid => match resp.user {
                Some(user) => {
                    info!("session restored for {}", user.email);
                    *self.state.write() = SessionState::Authenticated(user);
                }
                None => {
                    warn!("token verified but no profile returned; discarding credential");
                    self.store.clear();
                    *self.state.write() = SessionState::Anonymous;
                }
            },
            Ok(_) => {
                info!("stored credential rejected by the service");
                self.store.clear();
                *self.state.write() = SessionState::Anonymous;
            }
            Err(e) => {
                warn!("token verification failed: {}", e.message());
                self.store.clear();
                *self.state.write() = SessionState::Anonymous;
            }
        }
    }

    /// Persist the credential from a successful login and mark the session
    /// authenticated. No network round trip.
    pub async fn sign_in(&self, user: UserProfile, token: SessionToken) {
        let _guard = self.transitions.lock().await;
        self.store.set(&token);
        info!("signed in as {}", user.email);
        *self.state.write() = SessionState::Authenticated(user);
    }

    /// Drop the credential and the in-memory profile. Local only; the
    /// service keeps nothing to invalidate. Always succeeds.
    pub async fn sign_out(&self) {
        let _guard = self.transitions.lock().await;
        self.store.clear();
        *self.state.write() = SessionState::Anonymous;
    }

    pub fn state(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        match &*self.state.read() {
            SessionState::Authenticated(user) => Some(user.clone()),
            _ => None,
        }
    }

    pub fn is_restoring(&self) -> bool {
        matches!(*self.state.read(), SessionState::Restoring)
    }
}
