//! OpenAPI/Utoipa configuration.

use crate::api::health::MISC_TAG;
use crate::bridge::BRIDGE_TAG;
use utoipa::OpenApi;

/// OpenAPI documentation configuration.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Authorization Bridge API",
        version = "1.0.0",
        description = "Delegated authorization for third-party clients through an upstream identity backend."
    ),
    tags(
        (name = MISC_TAG, description = "Miscellaneous endpoints"),
        (name = BRIDGE_TAG, description = "Authorization code exchange endpoints")
    )
)]
pub struct ApiDoc;
