use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// The store was used before hydration, outside its lifecycle scope.
    #[error("session subsystem is not initialized")]
    NotInitialized,
    #[error("a session is already active")]
    AlreadyAuthenticated,
    #[error("no active session")]
    NotAuthenticated,
    #[error("credentials rejected by the authentication service")]
    InvalidCredentials,
    /// Terminal for the session; surfaced only through the forced logout it
    /// triggers, never returned to a caller.
    #[error("token refresh failed: {0}")]
    RefreshFailed(String),
    /// Non-fatal; the provisional user record is kept.
    #[error("profile fetch failed: {0}")]
    ProfileFetchFailed(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, AuthError>;
