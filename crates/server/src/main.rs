use auth_bridge::api::start_webserver;
use auth_bridge::bridge::{BridgeSettings, BridgeState};
use auth_bridge::config::load_config_or_panic;
use auth_bridge::identity::HttpIdentityBackend;
use auth_bridge::store::DbTokenStore;
use sea_orm::Database;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn initialize_tracing() {
    let default_directives = "auth_bridge=info,tower_http=info,sea_orm=warn";
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    let layer = fmt::layer().with_target(true).with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layer)
        .init();
}

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;
    // A missing .env file is fine; real deployments set the environment directly.
    let _ = dotenvy::dotenv();

    initialize_tracing();

    let config = load_config_or_panic();
    let mut state = BridgeState::new(BridgeSettings::from(&config.bridge));

    match &config.identity {
        Some(identity) => {
            let backend = HttpIdentityBackend::new(identity, config.bridge.backend_timeout())?;
            tracing::info!(url = %identity.url, provider = %config.bridge.provider, "Identity backend configured");
            state = state.with_backend(Arc::new(backend));
        }
        None => tracing::warn!("No identity backend configured; authorize and callback will fail"),
    }

    match &config.database_url {
        Some(url) => {
            let db = Arc::new(Database::connect(url).await?);
            tracing::info!("Token store connected");
            state = state.with_store(Arc::new(DbTokenStore::new(db)));
        }
        None => tracing::warn!("No database configured; callback and token will fail"),
    }

    start_webserver(state, config.listen_addr).await?;
    Ok(())
}
