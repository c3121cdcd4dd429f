use super::tokens::TokenPair;
use super::user::CurrentUser;

/// Login credentials, forwarded verbatim to the authentication service.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Externally observable session state.
///
/// The variants encode the lifecycle invariant directly: a user record exists
/// exactly when a token pair does, so no commit can expose one without the
/// other.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    /// The store has not been hydrated yet.
    #[default]
    Uninitialized,
    /// No session; tokens and user are both absent.
    SignedOut,
    /// Live session. `user` starts provisional and is resolved by profile sync.
    SignedIn { tokens: TokenPair, user: CurrentUser },
}

impl AuthState {
    #[must_use]
    pub const fn tokens(&self) -> Option<&TokenPair> {
        match self {
            Self::SignedIn { tokens, .. } => Some(tokens),
            Self::Uninitialized | Self::SignedOut => None,
        }
    }

    #[must_use]
    pub const fn current_user(&self) -> Option<&CurrentUser> {
        match self {
            Self::SignedIn { user, .. } => Some(user),
            Self::Uninitialized | Self::SignedOut => None,
        }
    }

    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        matches!(self, Self::SignedIn { .. })
    }

    #[must_use]
    pub const fn is_uninitialized(&self) -> bool {
        matches!(self, Self::Uninitialized)
    }
}
