use auth_bridge::error::{BridgeError, Collaborator, IdentityError, StoreError};
use axum::http::StatusCode;
use axum::response::IntoResponse;

async fn body_of(err: BridgeError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

#[tokio::test]
async fn test_client_errors() {
    let (status, body) = body_of(BridgeError::MissingParameter).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, serde_json::json!({ "error": "Missing required parameters" }));

    let (status, body) = body_of(BridgeError::InvalidRedirectUri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid redirect_uri");

    let (status, body) =
        body_of(BridgeError::SessionExchangeFailed("invalid flow state".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid flow state");
}

#[tokio::test]
async fn test_token_errors_are_unauthorized() {
    let (status, body) = body_of(BridgeError::InvalidToken).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token");

    let (status, body) = body_of(BridgeError::TokenExpired).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token expired");
}

#[tokio::test]
async fn test_server_errors() {
    let cases = [
        (
            BridgeError::BackendUnavailable(Collaborator::IdentityBackend),
            "Identity backend unavailable",
        ),
        (
            BridgeError::BackendUnavailable(Collaborator::TokenStore),
            "Token store unavailable",
        ),
        (BridgeError::BackendError("Unsupported provider".into()), "Unsupported provider"),
        (BridgeError::SessionIncomplete, "No session returned by identity backend"),
        (BridgeError::StoreWriteFailed, "Failed to store token"),
    ];

    for (err, message) in cases {
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], message);
    }
}

#[test]
fn test_identity_error_display() {
    assert_eq!(
        IdentityError::Rejected("bad code".into()).to_string(),
        "bad code"
    );
    assert!(
        IdentityError::InvalidResponse("eof".into())
            .to_string()
            .contains("eof")
    );
    assert!(!IdentityError::InvalidUrl("x".into()).is_timeout());
}

#[test]
fn test_store_error_from_db_err() {
    let err: StoreError = sea_orm::DbErr::Custom("disk full".into()).into();
    assert!(err.to_string().contains("disk full"));
}
