use crate::adapters::AuthApi;
use crate::domain::TokenPair;
use crate::store::AuthStore;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::watch;
use tokio::time::Instant;

/// Lead time before access expiry at which a proactive refresh fires.
pub const SAFETY_MARGIN: time::Duration = time::Duration::seconds(10);

/// Renews the access credential before it expires, for as long as a session is
/// alive.
///
/// At most one timer is ever pending: the run loop holds a single
/// `sleep_until` and recomputes its deadline on every store commit, which is
/// cancel-then-rearm by construction. A successful exchange commits the new
/// pair and thereby re-arms against the new expiry; any failure force-clears
/// the session with no retry. Nothing is armed while tokens are absent.
#[derive(Debug)]
pub struct TokenRefreshWorker {
    store: Arc<AuthStore>,
    api: Arc<dyn AuthApi>,
}

/// Snapshot taken when the timer is armed.
///
/// `armed_wall`/`armed_at` project the wall clock forward from monotonic
/// elapsed time, so the fire-time re-check agrees with the timer basis.
#[derive(Debug, Clone)]
struct ArmedRefresh {
    refresh_token: String,
    access_expires_at: OffsetDateTime,
    deadline: Instant,
    armed_wall: OffsetDateTime,
    armed_at: Instant,
}

impl ArmedRefresh {
    fn arm(tokens: &TokenPair) -> Self {
        let armed_wall = OffsetDateTime::now_utc();
        let armed_at = Instant::now();
        // within the safety window (or already expired) the delay clamps to
        // zero and the refresh fires immediately
        let delay = (tokens.access_expires_at - armed_wall - SAFETY_MARGIN).max(time::Duration::ZERO);
        Self {
            refresh_token: tokens.refresh.clone(),
            access_expires_at: tokens.access_expires_at,
            deadline: armed_at + delay.unsigned_abs(),
            armed_wall,
            armed_at,
        }
    }

    fn projected_now(&self) -> OffsetDateTime {
        self.armed_wall + (Instant::now() - self.armed_at)
    }
}

impl TokenRefreshWorker {
    #[must_use]
    pub fn new(store: Arc<AuthStore>, api: Arc<dyn AuthApi>) -> Self {
        Self { store, api }
    }

    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut state_rx = self.store.subscribe();
        loop {
            let mut armed = state_rx.borrow_and_update().tokens().map(ArmedRefresh::arm);
            let deadline = armed.as_ref().map_or_else(Instant::now, |a| a.deadline);

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
                    // state committed; the next pass re-arms against it
                }
                () = tokio::time::sleep_until(deadline), if armed.is_some() => {
                    if let Some(armed) = armed.take() {
                        self.fire(armed).await;
                    }
                }
            }
        }
        tracing::info!("Token refresh worker shutting down...");
    }

    async fn fire(&self, armed: ArmedRefresh) {
        if armed.access_expires_at - armed.projected_now() > SAFETY_MARGIN {
            // spurious wake-up; only a state commit re-arms
            tracing::debug!("Refresh timer fired outside the safety window; skipping");
            return;
        }
        if self.store.state().tokens().is_none() {
            tracing::debug!("Tokens gone before the refresh fired; nothing to renew");
            return;
        }

        let result = self.api.refresh(&armed.refresh_token).await;

        // the session may have ended or been replaced while the exchange was
        // in flight; the outcome only applies to the session that started it
        let still_current =
            self.store.state().tokens().is_some_and(|t| t.refresh == armed.refresh_token);
        if !still_current {
            tracing::debug!("Session changed while the refresh was in flight; dropping the result");
            return;
        }

        match result {
            Ok(tokens) => {
                tracing::info!(expires_at = ?tokens.access_expires_at, "Access credential renewed");
                self.store.set_tokens(Some(tokens));
            }
            Err(error) => {
                // terminal for the session: observers learn about it through
                // the forced logout, not through an error return
                tracing::warn!(%error, "Token refresh failed; forcing logout");
                self.store.set_tokens(None);
            }
        }
    }
}
