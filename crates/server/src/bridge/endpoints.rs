//! Bridge HTTP endpoints.
//!
//! Implements the three legs of the authorization-code exchange:
//! - Authorization endpoint
//! - Callback endpoint (return address of the identity backend)
//! - Token endpoint

use crate::bridge::{
    BRIDGE_TAG,
    return_address::{client_redirect, parse_redirect_uri, return_address},
    state::BridgeState,
};
use crate::error::{BridgeError, Collaborator, ErrorResponse};
use crate::store::NewTokenRecord;
use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::time::timeout;
use utoipa::{IntoParams, ToSchema};
use utoipa_axum::{router::OpenApiRouter, routes};

/// Creates the bridge router.
pub fn router(state: BridgeState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(authorize))
        .routes(routes!(callback))
        .routes(routes!(token))
        .with_state(state)
}

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuthorizeParams {
    /// Where the client wants the final code delivered
    pub redirect_uri: Option<String>,
    /// Opaque value echoed back to the client unchanged
    pub state: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CallbackParams {
    /// The identity backend's own authorization code
    pub code: Option<String>,
    pub redirect_uri: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TokenRequest {
    /// Code delivered to the client by the callback redirect
    pub code: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// Seconds of validity left at the time of the request
    pub expires_in: i64,
}

// =============================================================================
// Endpoints
// =============================================================================

/// Authorization endpoint.
///
/// Opens a delegated login with the identity backend and sends the browser
/// there. The return address embeds the client's `redirect_uri` and `state`.
#[tracing::instrument(skip_all, fields(redirect_uri))]
#[utoipa::path(
    get,
    path = "/authorize",
    tag = BRIDGE_TAG,
    operation_id = "Bridge Authorize",
    summary = "Start a delegated login",
    description = "Validates the client's `redirect_uri` and `state`, opens a delegated login with the \
                   identity backend and redirects the browser to it. After the user authenticates, the \
                   backend sends the browser to `/oauth/callback` with the original parameters intact.",
    params(AuthorizeParams),
    responses(
        (status = 302, description = "Redirect to the identity backend's login page"),
        (status = 400, description = "Missing or invalid parameters", body = ErrorResponse),
        (status = 500, description = "Identity backend unavailable or failing", body = ErrorResponse),
    )
)]
pub async fn authorize(
    State(state): State<BridgeState>,
    params: Result<Query<AuthorizeParams>, QueryRejection>,
) -> Result<Response, BridgeError> {
    let Query(params) = params.map_err(malformed_query)?;
    let (Some(redirect_uri), Some(client_state)) =
        (required(params.redirect_uri), required(params.state))
    else {
        return Err(BridgeError::MissingParameter);
    };
    tracing::Span::current().record("redirect_uri", redirect_uri.as_str());
    parse_redirect_uri(&redirect_uri)?;

    let backend = state.backend()?;
    let settings = &state.settings;
    let return_to = return_address(&settings.base_url, &redirect_uri, &client_state);

    let login = timeout(
        settings.backend_timeout,
        backend.begin_delegated_login(&settings.provider, return_to.as_str()),
    )
    .await
    .map_err(|_| {
        tracing::warn!("Timed out opening delegated login");
        BridgeError::BackendUnavailable(Collaborator::IdentityBackend)
    })?
    .map_err(|e| {
        tracing::error!("Identity backend failed to open delegated login: {}", e);
        if e.is_timeout() {
            BridgeError::BackendUnavailable(Collaborator::IdentityBackend)
        } else {
            BridgeError::BackendError(e.to_string())
        }
    })?;

    Ok(found(login.url))
}

/// Callback endpoint.
///
/// Exchanges the backend's code for a session, persists the token record and
/// redirects to the client. Nothing is redirected unless the record is stored.
#[tracing::instrument(skip_all, fields(redirect_uri))]
#[utoipa::path(
    get,
    path = "/callback",
    tag = BRIDGE_TAG,
    operation_id = "Bridge Callback",
    summary = "Finish a delegated login",
    description = "Return address of the identity backend. Exchanges the backend's authorization code \
                   for a session, stores a token record and redirects to the client's `redirect_uri` \
                   with `code` and `state` appended.\n\n\
                   **Note:** the backend's code is single-use; replaying a callback fails the exchange.",
    params(CallbackParams),
    responses(
        (status = 302, description = "Redirect to the client with `code` and `state`"),
        (status = 400, description = "Missing parameters or rejected code exchange", body = ErrorResponse),
        (status = 500, description = "Backend unavailable, incomplete session or store failure", body = ErrorResponse),
    )
)]
pub async fn callback(
    State(state): State<BridgeState>,
    params: Result<Query<CallbackParams>, QueryRejection>,
) -> Result<Response, BridgeError> {
    let Query(params) = params.map_err(malformed_query)?;
    let (Some(code), Some(redirect_uri), Some(client_state)) = (
        required(params.code),
        required(params.redirect_uri),
        required(params.state),
    ) else {
        return Err(BridgeError::MissingParameter);
    };
    tracing::Span::current().record("redirect_uri", redirect_uri.as_str());
    let target = parse_redirect_uri(&redirect_uri)?;

    let backend = state.backend()?;
    let store = state.store()?;
    let settings = &state.settings;

    let exchanged = timeout(settings.backend_timeout, backend.exchange_code(&code))
        .await
        .map_err(|_| {
            tracing::warn!("Timed out exchanging code with identity backend");
            BridgeError::BackendUnavailable(Collaborator::IdentityBackend)
        })?
        .map_err(|e| {
            tracing::warn!("Code exchange failed: {}", e);
            if e.is_timeout() {
                BridgeError::BackendUnavailable(Collaborator::IdentityBackend)
            } else {
                BridgeError::SessionExchangeFailed(e.to_string())
            }
        })?;

    let (Some(user), Some(session)) = (exchanged.user, exchanged.session) else {
        tracing::error!("Identity backend returned no user or no session");
        return Err(BridgeError::SessionIncomplete);
    };

    let expires_in = session.expires_in.unwrap_or(settings.default_expires_in);
    let expires_at = OffsetDateTime::now_utc()
        .checked_add(time::Duration::seconds(expires_in))
        .ok_or_else(|| {
            tracing::error!(expires_in, "Identity backend returned an unusable session lifetime");
            BridgeError::BackendError("Invalid session lifetime".into())
        })?;

    let record = NewTokenRecord {
        user_id: user.id,
        access_token: session.access_token,
        refresh_token: session.refresh_token,
        expires_at,
    };

    timeout(settings.store_timeout, store.insert(&record))
        .await
        .map_err(|_| {
            tracing::error!("Timed out storing token record");
            BridgeError::StoreWriteFailed
        })?
        .map_err(|e| {
            tracing::error!("Failed to store token record: {}", e);
            BridgeError::StoreWriteFailed
        })?;

    tracing::info!(user_id = %record.user_id, expires_in, "Delegated login completed");

    Ok(found(
        client_redirect(&target, &record.access_token, &client_state).into(),
    ))
}

/// Token endpoint.
///
/// Reads are side-effect free: a still-valid code can be exchanged repeatedly
/// and reports the remaining lifetime each time.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    post,
    path = "/token",
    tag = BRIDGE_TAG,
    operation_id = "Bridge Token",
    summary = "Exchange a code for the bearer token",
    description = "Looks up the token record for `code` and returns the bearer token with its \
                   remaining lifetime in seconds. Unknown codes and lookup failures are both reported \
                   as `Invalid token`.",
    request_body(
        content = TokenRequest,
        content_type = "application/json",
        description = "Code received on the client's redirect_uri"
    ),
    responses(
        (status = 200, description = "Bearer token issued", body = TokenResponse),
        (status = 400, description = "Missing code", body = ErrorResponse),
        (status = 401, description = "Invalid or expired token", body = ErrorResponse),
        (status = 500, description = "Token store unavailable", body = ErrorResponse),
    )
)]
pub async fn token(
    State(state): State<BridgeState>,
    body: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, BridgeError> {
    let code = body
        .ok()
        .and_then(|Json(req)| required(req.code))
        .ok_or(BridgeError::MissingParameter)?;

    let store = state.store()?;

    // Not found and lookup failure look the same to the caller.
    let record = match timeout(state.settings.store_timeout, store.find_by_access_token(&code))
        .await
    {
        Ok(Ok(Some(record))) => record,
        Ok(Ok(None)) => {
            tracing::debug!("No token record for presented code");
            return Err(BridgeError::InvalidToken);
        }
        Ok(Err(e)) => {
            tracing::error!("Token lookup failed: {}", e);
            return Err(BridgeError::InvalidToken);
        }
        Err(_) => {
            tracing::error!("Timed out looking up token record");
            return Err(BridgeError::InvalidToken);
        }
    };

    let now = OffsetDateTime::now_utc();
    if record.is_expired_at(now) {
        tracing::debug!(user_id = %record.user_id, "Token expired");
        return Err(BridgeError::TokenExpired);
    }

    Ok(Json(TokenResponse {
        expires_in: record.remaining_secs(now),
        access_token: record.access_token,
        token_type: "bearer".to_string(),
    }))
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Empty query values count as absent.
fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// An unparseable query is reported like an incomplete one.
fn malformed_query(rejection: QueryRejection) -> BridgeError {
    tracing::debug!("Rejected query string: {}", rejection.body_text());
    BridgeError::MissingParameter
}

fn found(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_treats_empty_as_missing() {
        assert_eq!(required(None), None);
        assert_eq!(required(Some(String::new())), None);
        assert_eq!(required(Some("xyz".into())), Some("xyz".to_string()));
    }

    #[test]
    fn found_sets_location() {
        let response = found("https://client.example/cb?code=tok1".into());
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[header::LOCATION],
            "https://client.example/cb?code=tok1"
        );
    }
}
