//! GoTrue-style REST client for the identity backend.

use super::{BackendSession, BackendUser, DelegatedSession, IdentityBackend, LoginRedirect};
use crate::config::IdentityConfig;
use crate::error::IdentityError;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use url::Url;

#[derive(Debug, Deserialize)]
struct UserBody {
    id: String,
}

/// Flat session payload; the backend may omit any part of it.
#[derive(Debug, Deserialize)]
struct SessionBody {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    user: Option<UserBody>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    error_description: Option<String>,
    msg: Option<String>,
}

impl ErrorBody {
    fn message(self) -> Option<String> {
        self.error_description.or(self.msg).or(self.error)
    }
}

pub struct HttpIdentityBackend {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl std::fmt::Debug for HttpIdentityBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpIdentityBackend")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpIdentityBackend {
    pub fn new(config: &IdentityConfig, timeout: Duration) -> Result<Self, IdentityError> {
        if config.url.cannot_be_a_base() {
            return Err(IdentityError::InvalidUrl(config.url.to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("auth-bridge/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: config.url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, IdentityError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| IdentityError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl IdentityBackend for HttpIdentityBackend {
    #[tracing::instrument(skip(self))]
    async fn begin_delegated_login(
        &self,
        provider: &str,
        return_address: &str,
    ) -> Result<LoginRedirect, IdentityError> {
        let mut url = self.endpoint(&["auth", "v1", "authorize"])?;
        url.query_pairs_mut()
            .append_pair("provider", provider)
            .append_pair("redirect_to", return_address);

        Ok(LoginRedirect { url: url.into() })
    }

    #[tracing::instrument(skip_all)]
    async fn exchange_code(&self, code: &str) -> Result<DelegatedSession, IdentityError> {
        let mut url = self.endpoint(&["auth", "v1", "token"])?;
        url.query_pairs_mut()
            .append_pair("grant_type", "authorization_code");

        let response = self
            .client
            .post(url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(&json!({ "auth_code": code }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.json::<ErrorBody>().await.unwrap_or_default();
            let message = body
                .message()
                .unwrap_or_else(|| format!("Identity backend returned HTTP {status}"));
            tracing::warn!(%status, "Identity backend rejected code exchange");
            return Err(IdentityError::Rejected(message));
        }

        let body = response
            .json::<SessionBody>()
            .await
            .map_err(|e| IdentityError::InvalidResponse(e.to_string()))?;

        Ok(DelegatedSession {
            user: body.user.map(|u| BackendUser { id: u.id }),
            session: body.access_token.map(|access_token| BackendSession {
                access_token,
                refresh_token: body.refresh_token,
                expires_in: body.expires_in,
            }),
        })
    }
}
