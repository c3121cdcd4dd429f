use crate::domain::{AuthState, CurrentUser, TokenPair};
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tokio::sync::watch;

/// Invoked after every committed token mutation (login, refresh, logout,
/// forced logout) with the new value; `None` means signed out. Owned by the
/// embedding application, typically for persistence.
pub type AuthChangeListener = Box<dyn Fn(Option<&TokenPair>) + Send + Sync>;

/// Single source of truth for the session state, shared by reference.
///
/// Commits go through a watch channel: every subscriber is marked the moment a
/// commit lands and re-evaluates its own scheduling decision from the new
/// snapshot. The store itself holds no lock beyond the channel's; mutations
/// are atomic per commit.
pub struct AuthStore {
    state: watch::Sender<AuthState>,
    on_auth_change: Option<AuthChangeListener>,
}

impl fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthStore").field("state", &*self.state.borrow()).finish_non_exhaustive()
    }
}

impl AuthStore {
    #[must_use]
    pub fn new(on_auth_change: Option<AuthChangeListener>) -> Self {
        let (state, _) = watch::channel(AuthState::Uninitialized);
        Self { state, on_auth_change }
    }

    /// Current snapshot; never blocks.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Observe every commit. The receiver always holds the latest snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Moves the store out of `Uninitialized`, optionally seeding tokens
    /// persisted by a previous run. Seeded tokens get a provisional user like
    /// any other token commit. Does not invoke the change listener: the
    /// listener's owner supplied this value.
    pub fn hydrate(&self, initial: Option<TokenPair>) {
        let applied = self.state.send_if_modified(|state| {
            if !state.is_uninitialized() {
                return false;
            }
            *state = match initial {
                Some(tokens) => AuthState::SignedIn { tokens, user: CurrentUser::provisional() },
                None => AuthState::SignedOut,
            };
            true
        });
        if applied {
            tracing::debug!("Auth store hydrated");
        } else {
            tracing::warn!("Hydrate called on an already-hydrated store; ignoring");
        }
    }

    /// Replaces the token pair wholesale.
    ///
    /// Present tokens derive a provisional user in the same commit, so the
    /// "user present iff tokens present" invariant holds without waiting on
    /// the profile fetch; absent tokens clear the user with them. The change
    /// listener fires once per commit; clearing an already-signed-out store is
    /// a no-op so a forced logout can never double-notify.
    pub fn set_tokens(&self, tokens: Option<TokenPair>) {
        let committed = self.state.send_if_modified(|state| match tokens {
            Some(tokens) => {
                *state = AuthState::SignedIn { tokens, user: CurrentUser::provisional() };
                true
            }
            None => {
                if state.is_signed_in() {
                    *state = AuthState::SignedOut;
                    true
                } else {
                    false
                }
            }
        });
        if committed {
            let current = self.state.borrow().tokens().cloned();
            self.notify_listener(current.as_ref());
        }
    }

    /// Merges the resolved profile into the live session.
    ///
    /// Dropped when no session exists: a fetch resolving after logout must not
    /// resurrect a user record.
    pub fn set_current_user(&self, user: CurrentUser) {
        let updated = self.state.send_if_modified(|state| match state {
            AuthState::SignedIn { user: current, .. } => {
                *current = user;
                true
            }
            AuthState::Uninitialized | AuthState::SignedOut => false,
        });
        if !updated {
            tracing::debug!("Dropping profile update; session ended before it resolved");
        }
    }

    fn notify_listener(&self, tokens: Option<&TokenPair>) {
        let Some(listener) = &self.on_auth_change else {
            return;
        };
        // fire-and-forget: a misbehaving listener must not poison the store
        if catch_unwind(AssertUnwindSafe(|| listener(tokens))).is_err() {
            tracing::warn!("Auth change listener panicked");
        }
    }
}
