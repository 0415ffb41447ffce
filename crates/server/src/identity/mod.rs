//! Identity backend contract.
//!
//! The bridge never authenticates users itself. It asks an upstream identity
//! backend to run a delegated login against a third-party provider and later
//! trades the backend's own authorization code for a session. Only the two
//! calls below are relied upon; the backend's session mechanics stay opaque.

mod http;

pub use http::HttpIdentityBackend;

use crate::error::IdentityError;

/// Where the user's browser should be sent to start the delegated login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRedirect {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendUser {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSession {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Lifetime in seconds, if the backend reported one.
    pub expires_in: Option<i64>,
}

/// Result of a successful code exchange. Both halves are optional on the wire;
/// callers must treat a missing user or session as an incomplete exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DelegatedSession {
    pub user: Option<BackendUser>,
    pub session: Option<BackendSession>,
}

#[async_trait::async_trait]
pub trait IdentityBackend: Send + Sync {
    /// Open a delegated login with `provider`. The backend redirects the
    /// browser to `return_address` once the user has authenticated.
    async fn begin_delegated_login(
        &self,
        provider: &str,
        return_address: &str,
    ) -> Result<LoginRedirect, IdentityError>;

    /// Trade the backend's single-use authorization code for a session.
    async fn exchange_code(&self, code: &str) -> Result<DelegatedSession, IdentityError>;
}
