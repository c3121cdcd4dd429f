use crate::adapters::AuthApi;
use crate::store::AuthStore;
use std::sync::Arc;
use tokio::sync::watch;

/// Resolves the provisional user record after each token acquisition.
///
/// Edge-triggered on the committed access token value: fires once per new
/// token (hydration, login, refresh), never while signed out. A failed fetch
/// keeps the provisional record until the next acquisition; there is no
/// standalone retry.
#[derive(Debug)]
pub struct ProfileSyncWorker {
    store: Arc<AuthStore>,
    api: Arc<dyn AuthApi>,
}

impl ProfileSyncWorker {
    #[must_use]
    pub fn new(store: Arc<AuthStore>, api: Arc<dyn AuthApi>) -> Self {
        Self { store, api }
    }

    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut state_rx = self.store.subscribe();
        // access token that most recently triggered a fetch
        let mut synced: Option<String> = None;

        loop {
            let present = {
                let state = state_rx.borrow_and_update();
                state.tokens().map(|t| t.access.clone())
            };
            match present {
                None => synced = None,
                Some(access) if synced.as_deref() != Some(access.as_str()) => {
                    synced = Some(access.clone());
                    self.resolve_profile(&access).await;
                }
                Some(_) => {}
            }

            tokio::select! {
                biased;
                res = shutdown.changed() => {
                    if res.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                changed = state_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        tracing::info!("Profile sync worker shutting down...");
    }

    async fn resolve_profile(&self, access_token: &str) {
        match self.api.profile(access_token).await {
            Ok(user) => {
                tracing::debug!(user_id = %user.user_id, "Profile resolved");
                self.store.set_current_user(user);
            }
            Err(error) => {
                // provisional record stays until the next token acquisition
                tracing::warn!(%error, "Profile fetch failed");
            }
        }
    }
}
