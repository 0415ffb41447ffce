use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Failures talking to the upstream identity backend.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Rejected(String),
    #[error("Invalid backend response: {0}")]
    InvalidResponse(String),
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
}

impl IdentityError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, IdentityError::Http(e) if e.is_timeout())
    }
}

/// Failures reading or writing the token store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Db(#[from] sea_orm::DbErr),
}

/// Upstream service a request depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collaborator {
    IdentityBackend,
    TokenStore,
}

impl std::fmt::Display for Collaborator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Collaborator::IdentityBackend => f.write_str("Identity backend"),
            Collaborator::TokenStore => f.write_str("Token store"),
        }
    }
}

/// Every outcome a bridge request can fail with. All of them are terminal for
/// the request and reported to the caller as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Missing required parameters")]
    MissingParameter,
    #[error("Invalid redirect_uri")]
    InvalidRedirectUri,
    /// Not configured, or did not answer within its timeout.
    #[error("{0} unavailable")]
    BackendUnavailable(Collaborator),
    #[error("{0}")]
    BackendError(String),
    #[error("{0}")]
    SessionExchangeFailed(String),
    #[error("No session returned by identity backend")]
    SessionIncomplete,
    #[error("Failed to store token")]
    StoreWriteFailed,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
}

impl BridgeError {
    pub fn status(&self) -> StatusCode {
        match self {
            BridgeError::MissingParameter
            | BridgeError::InvalidRedirectUri
            | BridgeError::SessionExchangeFailed(_) => StatusCode::BAD_REQUEST,
            BridgeError::InvalidToken | BridgeError::TokenExpired => StatusCode::UNAUTHORIZED,
            BridgeError::BackendUnavailable(_)
            | BridgeError::BackendError(_)
            | BridgeError::SessionIncomplete
            | BridgeError::StoreWriteFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let status = self.status();
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
