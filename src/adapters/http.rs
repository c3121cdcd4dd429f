use super::AuthApi;
use crate::domain::{Credentials, CurrentUser, TokenPair};
use crate::error::{AuthError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use time::OffsetDateTime;

/// reqwest-backed [`AuthApi`] implementation.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    access_token: String,
    #[serde(with = "time::serde::timestamp")]
    access_token_expires_at: OffsetDateTime,
    refresh_token: String,
    #[serde(with = "time::serde::timestamp")]
    refresh_token_expires_at: OffsetDateTime,
}

impl From<TokenResponse> for TokenPair {
    fn from(resp: TokenResponse) -> Self {
        Self {
            access: resp.access_token,
            access_expires_at: resp.access_token_expires_at,
            refresh: resp.refresh_token,
            refresh_expires_at: resp.refresh_token_expires_at,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileResponse {
    user_id: String,
    display_name: String,
    email: String,
}

impl HttpAuthApi {
    /// # Errors
    /// Fails if the underlying HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    /// Extracts the service's `{"error": ...}` body, falling back to the
    /// status line.
    async fn error_detail(resp: reqwest::Response) -> String {
        let status = resp.status();
        resp.json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| body.get("error").and_then(serde_json::Value::as_str).map(str::to_string))
            .unwrap_or_else(|| format!("service returned {status}"))
    }
}

#[async_trait::async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<TokenPair> {
        let resp = self
            .client
            .post(format!("{}/v1/sessions", self.base_url))
            .json(&LoginRequest { email: &credentials.email, password: &credentials.password })
            .send()
            .await?;

        if !resp.status().is_success() {
            tracing::debug!(status = %resp.status(), "Login rejected");
            return Err(AuthError::InvalidCredentials);
        }
        Ok(resp.json::<TokenResponse>().await?.into())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        let resp = self
            .client
            .post(format!("{}/v1/sessions/refresh", self.base_url))
            .json(&RefreshRequest { refresh_token })
            .send()
            .await
            .map_err(|e| AuthError::RefreshFailed(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(AuthError::RefreshFailed(Self::error_detail(resp).await));
        }
        resp.json::<TokenResponse>()
            .await
            .map(Into::into)
            .map_err(|e| AuthError::RefreshFailed(e.to_string()))
    }

    async fn profile(&self, access_token: &str) -> Result<CurrentUser> {
        let resp = self
            .client
            .get(format!("{}/v1/profile", self.base_url))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::ProfileFetchFailed(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(AuthError::ProfileFetchFailed(Self::error_detail(resp).await));
        }
        let profile: ProfileResponse =
            resp.json().await.map_err(|e| AuthError::ProfileFetchFailed(e.to_string()))?;
        Ok(CurrentUser {
            user_id: profile.user_id,
            name: profile.display_name,
            email: profile.email,
        })
    }
}
