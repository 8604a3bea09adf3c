//! Authentication session lifecycle
//!
//! Login, registration, logout, and startup restore over the shared
//! session. Login is two dependent calls (token exchange, then profile);
//! the session only counts as authenticated once both have succeeded.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::error::Result;
use crate::gateway::SwapSpecClient;
use crate::session::SessionHandle;
use crate::types::{RegisterRequest, User};

/// Lifecycle states of the authentication session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// No usable session. A stored token may still exist on disk for a
    /// later [`AuthManager::restore_session`].
    Anonymous,
    /// Credential exchange or profile fetch in flight.
    Authenticating,
    /// Token and profile both present.
    Authenticated,
    /// Startup rehydration of a stored token in flight.
    Restoring,
}

/// Drives the auth lifecycle over a shared client.
///
/// The manager and the 401 teardown inside the client are the only writers
/// of session state; screens read [`AuthManager::state`] and the session's
/// `current_user`.
pub struct AuthManager {
    client: Arc<SwapSpecClient>,
    state: RwLock<AuthState>,
}

impl AuthManager {
    pub fn new(client: Arc<SwapSpecClient>) -> Self {
        Self {
            client,
            state: RwLock::new(AuthState::Anonymous),
        }
    }

    /// Current lifecycle state. A 401 teardown empties the session without
    /// going through the manager, so an `Authenticated` reading is
    /// re-checked against the session and downgraded when the token is
    /// gone.
    pub fn state(&self) -> AuthState {
        let current = *self.state.read().unwrap_or_else(PoisonError::into_inner);
        if current == AuthState::Authenticated && !self.session().is_authenticated() {
            self.set_state(AuthState::Anonymous);
            return AuthState::Anonymous;
        }
        current
    }

    /// The session shared with the client.
    pub fn session(&self) -> &SessionHandle {
        self.client.session()
    }

    fn set_state(&self, next: AuthState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = next;
    }

    /// Creates an account. No session is established and the lifecycle
    /// state is untouched; logging in afterwards is explicit.
    pub async fn register(&self, request: &RegisterRequest) -> Result<User> {
        self.client.register(request).await
    }

    /// Logs in: exchanges credentials, persists the token immediately, then
    /// fetches the profile as a dependent second call.
    ///
    /// When the profile fetch fails for any reason other than a 401, the
    /// stored token survives so a later [`restore_session`] can finish the
    /// job; the session still reports no `current_user` and the state
    /// returns to [`AuthState::Anonymous`].
    ///
    /// [`restore_session`]: Self::restore_session
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        self.set_state(AuthState::Authenticating);

        let token = match self.client.login(email, password).await {
            Ok(token) => token,
            Err(e) => {
                self.set_state(AuthState::Anonymous);
                return Err(e);
            }
        };
        self.session().set_token(&token.access_token);

        match self.client.me().await {
            Ok(user) => {
                self.session().set_user(user.clone());
                self.set_state(AuthState::Authenticated);
                info!(email = %user.email, "session established");
                Ok(user)
            }
            Err(e) => {
                // token stays stored unless the failure was a 401, in which
                // case the teardown already cleared it
                self.set_state(AuthState::Anonymous);
                Err(e)
            }
        }
    }

    /// Rehydrates a previous session at startup. `Ok(None)` means nothing
    /// was stored; a failed profile fetch clears the stale token and
    /// surfaces the failure.
    pub async fn restore_session(&self) -> Result<Option<User>> {
        if !self.session().is_authenticated() {
            self.set_state(AuthState::Anonymous);
            return Ok(None);
        }

        self.set_state(AuthState::Restoring);
        match self.client.me().await {
            Ok(user) => {
                self.session().set_user(user.clone());
                self.set_state(AuthState::Authenticated);
                info!(email = %user.email, "session restored");
                Ok(Some(user))
            }
            Err(e) => {
                self.session().clear();
                self.set_state(AuthState::Anonymous);
                Err(e)
            }
        }
    }

    /// Local-only logout: clears the session and the stored token without
    /// any network call. The invalidation hook does not fire.
    pub fn logout(&self) {
        self.session().clear();
        self.set_state(AuthState::Anonymous);
        info!("session closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryTokenStore;
    use crate::transport::MockTransport;

    fn manager() -> AuthManager {
        let client = SwapSpecClient::with_transport(
            Arc::new(MockTransport::new()),
            Arc::new(MemoryTokenStore::new()),
        );
        AuthManager::new(Arc::new(client))
    }

    #[test]
    fn test_starts_anonymous() {
        assert_eq!(manager().state(), AuthState::Anonymous);
    }

    #[test]
    fn test_stale_authenticated_reading_downgrades_after_teardown() {
        let manager = manager();
        manager.session().set_token("t");
        manager.set_state(AuthState::Authenticated);

        manager.session().invalidate();

        assert_eq!(manager.state(), AuthState::Anonymous);
    }

    #[tokio::test]
    async fn test_restore_with_nothing_stored_is_a_clean_none() {
        let manager = manager();
        let restored = manager.restore_session().await.unwrap();
        assert!(restored.is_none());
        assert_eq!(manager.state(), AuthState::Anonymous);
    }
}
