use crate::adapters::AuthApi;
use crate::domain::TokenPair;
use crate::services::SessionService;
use crate::store::{AuthChangeListener, AuthStore};
use crate::workers::{ProfileSyncWorker, TokenRefreshWorker};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Wires the store, session service, and workers together.
pub struct SessionBuilder {
    api: Arc<dyn AuthApi>,
    initial_tokens: Option<TokenPair>,
    on_auth_change: Option<AuthChangeListener>,
}

impl fmt::Debug for SessionBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionBuilder")
            .field("api", &self.api)
            .field("initial_tokens", &self.initial_tokens)
            .finish_non_exhaustive()
    }
}

impl SessionBuilder {
    #[must_use]
    pub fn new(api: Arc<dyn AuthApi>) -> Self {
        Self { api, initial_tokens: None, on_auth_change: None }
    }

    /// Seeds the store with tokens persisted by a previous run.
    #[must_use]
    pub fn with_initial_tokens(mut self, tokens: TokenPair) -> Self {
        self.initial_tokens = Some(tokens);
        self
    }

    /// Listener invoked on every committed token mutation, typically to
    /// persist the pair externally.
    #[must_use]
    pub fn with_on_auth_change(
        mut self,
        listener: impl Fn(Option<&TokenPair>) + Send + Sync + 'static,
    ) -> Self {
        self.on_auth_change = Some(Box::new(listener));
        self
    }

    #[must_use]
    pub fn build(self) -> Session {
        let store = Arc::new(AuthStore::new(self.on_auth_change));
        store.hydrate(self.initial_tokens);
        let service = SessionService::new(Arc::clone(&store), Arc::clone(&self.api));
        Session { store, service, api: self.api }
    }
}

/// A wired session subsystem. Workers are spawned explicitly so the caller
/// owns their lifetimes and shutdown.
pub struct Session {
    store: Arc<AuthStore>,
    service: SessionService,
    api: Arc<dyn AuthApi>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").field("store", &self.store).finish_non_exhaustive()
    }
}

impl Session {
    #[must_use]
    pub const fn store(&self) -> &Arc<AuthStore> {
        &self.store
    }

    #[must_use]
    pub const fn service(&self) -> &SessionService {
        &self.service
    }

    /// Spawns the refresh and profile-sync workers; both exit once `shutdown`
    /// flips to true.
    #[must_use]
    pub fn spawn_workers(&self, shutdown: &watch::Receiver<bool>) -> Vec<JoinHandle<()>> {
        let refresh = TokenRefreshWorker::new(Arc::clone(&self.store), Arc::clone(&self.api));
        let profile = ProfileSyncWorker::new(Arc::clone(&self.store), Arc::clone(&self.api));
        vec![tokio::spawn(refresh.run(shutdown.clone())), tokio::spawn(profile.run(shutdown.clone()))]
    }
}

/// Flips the shutdown signal when ctrl-c is received.
pub fn spawn_signal_handler(tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            tracing::error!("Failed to listen for shutdown signal");
            return;
        }
        tracing::info!("Shutdown signal received");
        let _ = tx.send(true);
    });
}
