//! Health check endpoint.

/// Tag for OpenAPI documentation.
pub const MISC_TAG: &str = "Miscellaneous";

/// Liveness check. Answers without touching any collaborator.
#[tracing::instrument()]
#[utoipa::path(
    method(get, head),
    path = "/healthz",
    tag = MISC_TAG,
    operation_id = "Health Check",
    summary = "Liveness check",
    description = "Reports that the bridge process is serving HTTP. It does not contact the identity \
                   backend or the token store; their absence shows up on the `/oauth` endpoints instead.",
    responses(
        (status = 200, description = "Service is healthy", body = str, content_type = "text/plain", example = "ok")
    )
)]
pub async fn health() -> &'static str {
    "ok"
}
