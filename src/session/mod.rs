//! Session state and durable token storage
//!
//! One [`SessionHandle`] is shared between the gateway (which reads the
//! token per request and runs the 401 teardown) and the auth manager (the
//! only other writer). [`TokenStore`] is the per-platform persistence
//! primitive; the crate ships a file-backed store and an in-memory one.

mod file;
mod memory;

pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

use crate::types::User;

/// Durable storage for the bearer token.
///
/// `load()` after `save(t)` returns `t`, including across a process restart
/// where the backing medium allows; `clear()` forgets it.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str);
    fn clear(&self);
}

/// Bearer token plus the profile fetched with it.
/// Invariant: `current_user` is only ever set while a token is present.
#[derive(Default)]
struct SessionState {
    token: Option<String>,
    current_user: Option<User>,
}

type InvalidationHook = Arc<dyn Fn() + Send + Sync>;

/// Shared session attached to one gateway instance.
///
/// Clones are cheap and observe the same state. There is deliberately no
/// process-wide session: independent handles coexist, one per client.
#[derive(Clone)]
pub struct SessionHandle {
    state: Arc<RwLock<SessionState>>,
    store: Arc<dyn TokenStore>,
    on_invalidated: Arc<RwLock<Option<InvalidationHook>>>,
}

impl SessionHandle {
    /// Wraps a store, priming the in-memory token from it so a restarted
    /// process sees its previous session before any network call.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let state = SessionState {
            token: store.load(),
            current_user: None,
        };
        Self {
            state: Arc::new(RwLock::new(state)),
            store,
            on_invalidated: Arc::new(RwLock::new(None)),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.read().current_user.clone()
    }

    /// Token presence; the profile may still be unfetched.
    pub fn is_authenticated(&self) -> bool {
        self.read().token.is_some()
    }

    /// Registers the host's return-to-login transition, fired when a 401
    /// tears the session down. Voluntary logout does not fire it.
    pub fn on_invalidated(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self
            .on_invalidated
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(hook));
    }

    pub(crate) fn set_token(&self, token: &str) {
        self.store.save(token);
        self.write().token = Some(token.to_string());
    }

    pub(crate) fn set_user(&self, user: User) {
        let mut state = self.write();
        if state.token.is_some() {
            state.current_user = Some(user);
        } else {
            // a teardown raced the profile fetch; keep the session anonymous
            warn!("discarding profile fetched for a session that no longer exists");
        }
    }

    /// Clears token and profile, in memory and in the store.
    pub(crate) fn clear(&self) {
        self.store.clear();
        let mut state = self.write();
        state.token = None;
        state.current_user = None;
    }

    /// 401 teardown: clear everything and notify the host, once per call.
    /// The hook runs with no lock held, so it may call back into the
    /// session, including re-registering itself.
    pub(crate) fn invalidate(&self) {
        warn!("session invalidated by server rejection");
        self.clear();
        let hook = self
            .on_invalidated
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(hook) = hook {
            hook();
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
