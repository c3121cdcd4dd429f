use authkeeper::adapters::AuthApi;
use authkeeper::domain::{Credentials, CurrentUser, TokenPair};
use authkeeper::error::{AuthError, Result};
use std::collections::VecDeque;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex, Once};
use time::OffsetDateTime;
use tokio::sync::Notify;

static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("authkeeper=debug".parse().unwrap());

        tracing_subscriber::fmt().with_env_filter(filter).init();
    });
}

#[allow(dead_code)]
pub fn credentials() -> Credentials {
    Credentials { email: "ann@x.com".to_string(), password: "password123".to_string() }
}

#[allow(dead_code)]
pub fn token_pair(access: &str, refresh: &str, expires_in: time::Duration) -> TokenPair {
    let now = OffsetDateTime::now_utc();
    TokenPair {
        access: access.to_string(),
        access_expires_at: now + expires_in,
        refresh: refresh.to_string(),
        refresh_expires_at: now + time::Duration::days(30),
    }
}

#[allow(dead_code)]
pub fn resolved_user() -> CurrentUser {
    CurrentUser { user_id: "u1".to_string(), name: "Ann".to_string(), email: "ann@x.com".to_string() }
}

/// Captures every `on_auth_change` invocation.
#[allow(dead_code)]
pub fn change_log() -> (Arc<Mutex<Vec<Option<TokenPair>>>>, impl Fn(Option<&TokenPair>) + Send + Sync + 'static)
{
    let log: Arc<Mutex<Vec<Option<TokenPair>>>> = Arc::default();
    let sink = Arc::clone(&log);
    (log, move |tokens: Option<&TokenPair>| sink.lock().unwrap().push(tokens.cloned()))
}

/// Yields enough times for spawned workers to observe the latest commit.
#[allow(dead_code)]
pub async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}

/// Programmable in-memory authentication service with call counters and
/// hold gates for racing in-flight operations.
#[derive(Debug, Default)]
pub struct StubAuthApi {
    login_results: Mutex<VecDeque<Result<TokenPair>>>,
    refresh_results: Mutex<VecDeque<Result<TokenPair>>>,
    profile_results: Mutex<VecDeque<Result<CurrentUser>>>,
    pub login_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub profile_calls: AtomicUsize,
    hold_logins: Mutex<bool>,
    hold_refreshes: Mutex<bool>,
    hold_profiles: Mutex<bool>,
    release: Notify,
}

#[allow(dead_code)]
impl StubAuthApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_login(&self, result: Result<TokenPair>) {
        self.login_results.lock().unwrap().push_back(result);
    }

    pub fn push_refresh(&self, result: Result<TokenPair>) {
        self.refresh_results.lock().unwrap().push_back(result);
    }

    pub fn push_profile(&self, result: Result<CurrentUser>) {
        self.profile_results.lock().unwrap().push_back(result);
    }

    /// Makes login calls block until [`Self::release_all`].
    pub fn hold_logins(&self) {
        *self.hold_logins.lock().unwrap() = true;
    }

    /// Makes refresh calls block until [`Self::release_all`].
    pub fn hold_refreshes(&self) {
        *self.hold_refreshes.lock().unwrap() = true;
    }

    /// Makes profile calls block until [`Self::release_all`].
    pub fn hold_profiles(&self) {
        *self.hold_profiles.lock().unwrap() = true;
    }

    pub fn release_all(&self) {
        *self.hold_logins.lock().unwrap() = false;
        *self.hold_refreshes.lock().unwrap() = false;
        *self.hold_profiles.lock().unwrap() = false;
        self.release.notify_waiters();
    }

    async fn wait_released(&self, gate: &Mutex<bool>) {
        loop {
            let waiter = self.release.notified();
            if !*gate.lock().unwrap() {
                break;
            }
            waiter.await;
        }
    }
}

#[async_trait::async_trait]
impl AuthApi for StubAuthApi {
    async fn login(&self, _credentials: &Credentials) -> Result<TokenPair> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_released(&self.hold_logins).await;
        self.login_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(AuthError::InvalidCredentials))
    }

    async fn refresh(&self, _refresh_token: &str) -> Result<TokenPair> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_released(&self.hold_refreshes).await;
        self.refresh_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(AuthError::RefreshFailed("no stubbed response".to_string())))
    }

    async fn profile(&self, _access_token: &str) -> Result<CurrentUser> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_released(&self.hold_profiles).await;
        self.profile_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(AuthError::ProfileFetchFailed("no stubbed response".to_string())))
    }
}
