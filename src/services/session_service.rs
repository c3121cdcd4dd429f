use crate::adapters::AuthApi;
use crate::domain::{AuthState, Credentials};
use crate::error::{AuthError, Result};
use crate::store::AuthStore;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

/// User-facing session operations: login and logout.
///
/// Both run under a single-flight gate, so overlapping calls serialize and
/// each precondition check is atomic with respect to the eventual commit. A
/// second login racing the first's network round trip therefore observes the
/// winner's commit and fails cleanly.
pub struct SessionService {
    store: Arc<AuthStore>,
    api: Arc<dyn AuthApi>,
    gate: Mutex<()>,
}

impl fmt::Debug for SessionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionService").field("store", &self.store).finish_non_exhaustive()
    }
}

impl SessionService {
    #[must_use]
    pub fn new(store: Arc<AuthStore>, api: Arc<dyn AuthApi>) -> Self {
        Self { store, api, gate: Mutex::new(()) }
    }

    /// Exchanges credentials for a session.
    ///
    /// # Errors
    /// `NotInitialized` before hydration and `AlreadyAuthenticated` while a
    /// session exists, both without a network call; `InvalidCredentials` on
    /// remote rejection. The store is untouched on every failure path.
    #[tracing::instrument(skip(self, credentials), err(level = "warn"))]
    pub async fn login(&self, credentials: &Credentials) -> Result<()> {
        let _flight = self.gate.lock().await;
        match self.store.state() {
            AuthState::Uninitialized => Err(AuthError::NotInitialized),
            AuthState::SignedIn { .. } => Err(AuthError::AlreadyAuthenticated),
            AuthState::SignedOut => {
                let tokens = self.api.login(credentials).await?;
                self.store.set_tokens(Some(tokens));
                tracing::info!("Login succeeded");
                Ok(())
            }
        }
    }

    /// Ends the session. Local only: tokens and user are cleared in a single
    /// commit and the change listener fires exactly once.
    ///
    /// # Errors
    /// `NotInitialized` before hydration, `NotAuthenticated` when no session
    /// exists.
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn logout(&self) -> Result<()> {
        let _flight = self.gate.lock().await;
        match self.store.state() {
            AuthState::Uninitialized => Err(AuthError::NotInitialized),
            AuthState::SignedOut => Err(AuthError::NotAuthenticated),
            AuthState::SignedIn { .. } => {
                self.store.set_tokens(None);
                tracing::info!("Logged out");
                Ok(())
            }
        }
    }
}
