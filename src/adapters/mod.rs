pub mod http;

pub use http::HttpAuthApi;

use crate::domain::{Credentials, CurrentUser, TokenPair};
use crate::error::Result;
use std::fmt;

/// Client-side port onto the remote authentication service.
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync + fmt::Debug {
    /// Exchanges credentials for a fresh token pair.
    async fn login(&self, credentials: &Credentials) -> Result<TokenPair>;

    /// Exchanges a refresh credential for a replacement token pair.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair>;

    /// Fetches the profile of the user owning `access_token`.
    async fn profile(&self, access_token: &str) -> Result<CurrentUser>;
}
