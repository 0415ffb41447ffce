use config::{Config, Environment, File};
use sea_orm_migration::prelude::*;
use std::env;

/// Resolve the database the same way the server does: `config.yaml` first,
/// then environment overrides.
fn database_url_from_config() -> Option<String> {
    Config::builder()
        .add_source(File::with_name("config.yaml").required(false))
        .add_source(Environment::default().separator("__"))
        .build()
        .and_then(|settings| settings.get_string("database_url"))
        .ok()
}

#[tokio::main]
async fn main() {
    if env::var("DATABASE_URL").is_err() {
        match database_url_from_config() {
            Some(url) => env::set_var("DATABASE_URL", url),
            None => eprintln!("No database_url in config.yaml or environment; pass -u <url>"),
        }
    }
    cli::run_cli(migration::Migrator).await;
}
