//! API module providing the HTTP surface of the bridge.
//!
//! - `bridge` endpoints are nested under `/oauth`
//! - `health` - Health check endpoint (/healthz)
//! - `openapi` - OpenAPI/Utoipa configuration, served with ReDoc at /api-docs

pub mod health;
pub mod openapi;

use crate::bridge::{self, BRIDGE_PREFIX, BridgeState};
use axum::Router;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_redoc::{Redoc, Servable};

/// Builds the full application router.
pub fn app(bridge_state: BridgeState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(openapi::ApiDoc::openapi())
        .nest(BRIDGE_PREFIX, bridge::router(bridge_state))
        .routes(routes!(health::health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .split_for_parts();

    router.merge(Redoc::with_url("/api-docs", api))
}

/// Starts the web server with all configured routes.
#[tracing::instrument(skip(bridge_state))]
pub async fn start_webserver(
    bridge_state: BridgeState,
    listen_addr: SocketAddr,
) -> color_eyre::Result<()> {
    let router = app(bridge_state);

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!(addr = %listen_addr, "Server running");
    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|e| color_eyre::Report::msg(format!("Failed to start server: {e}")))?;

    Ok(())
}
