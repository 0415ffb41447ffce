use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration build error: {0}")]
    Build(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Connection details for the upstream identity backend.
#[derive(Clone, Debug, Deserialize)]
pub struct IdentityConfig {
    pub url: Url,
    pub api_key: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BridgeConfig {
    /// Public base URL of this service, used to build the callback return address.
    pub base_url: Url,
    /// Identity provider the backend should delegate the login to.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Lifetime applied when the backend does not report `expires_in`.
    #[serde(default = "default_expires_in")]
    pub default_expires_in: i64,
    #[serde(default = "default_backend_timeout_secs")]
    pub backend_timeout_secs: u64,
    #[serde(default = "default_store_timeout_secs")]
    pub store_timeout_secs: u64,
}

impl BridgeConfig {
    pub fn backend_timeout(&self) -> Duration {
        Duration::from_secs(self.backend_timeout_secs)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    /// Token store database. Without it the token store is reported as unavailable.
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
    pub bridge: BridgeConfig,
    /// Without it the identity backend is reported as unavailable.
    #[serde(default)]
    pub identity: Option<IdentityConfig>,
}

fn default_provider() -> String {
    "github".to_string()
}

fn default_expires_in() -> i64 {
    3600
}

fn default_backend_timeout_secs() -> u64 {
    10
}

fn default_store_timeout_secs() -> u64 {
    5
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

impl AppConfig {
    /// Check invariants the deserializer cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bridge.base_url.cannot_be_a_base() {
            return Err(ConfigError::Validation(
                "bridge.base_url must be an absolute http(s) URL".into(),
            ));
        }
        if self.bridge.provider.trim().is_empty() {
            return Err(ConfigError::Validation(
                "bridge.provider must not be empty".into(),
            ));
        }
        if self.bridge.default_expires_in <= 0 {
            return Err(ConfigError::Validation(
                "bridge.default_expires_in must be > 0".into(),
            ));
        }
        if self.bridge.backend_timeout_secs == 0 || self.bridge.store_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "bridge timeouts must be > 0".into(),
            ));
        }
        if let Some(identity) = &self.identity
            && identity.api_key.is_empty()
        {
            return Err(ConfigError::Validation(
                "identity.api_key must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Load application configuration from `config.yaml` + environment overrides.
///
/// Environment variables matching the key path separated by double underscores
/// (e.g. `BRIDGE__BASE_URL`, `IDENTITY__API_KEY`) override the file value.
/// The file itself is optional so a container can be configured from the
/// environment alone.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    use config::{Config, Environment, File};
    let cfg = Config::builder()
        .add_source(File::with_name("config.yaml").required(false))
        .add_source(Environment::default().separator("__"))
        .build()?;

    let app: AppConfig = cfg.try_deserialize()?;
    app.validate()?;

    Ok(app)
}

/// Convenience helper for binaries wanting panic-on-error behaviour.
pub fn load_config_or_panic() -> AppConfig {
    match load_config() {
        Ok(c) => c,
        Err(e) => panic!("Failed to load configuration: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> AppConfig {
        config::Config::builder()
            .add_source(config::File::from_str(yaml, config::FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn defaults_are_applied() {
        let cfg = parse(
            r#"
bridge:
  base_url: "https://bridge.example"
"#,
        );
        assert_eq!(cfg.bridge.provider, "github");
        assert_eq!(cfg.bridge.default_expires_in, 3600);
        assert_eq!(cfg.bridge.backend_timeout(), Duration::from_secs(10));
        assert_eq!(cfg.bridge.store_timeout(), Duration::from_secs(5));
        assert_eq!(cfg.listen_addr.port(), 8080);
        assert!(cfg.identity.is_none());
        assert!(cfg.database_url.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_non_base_url() {
        let cfg = parse(
            r#"
bridge:
  base_url: "mailto:ops@bridge.example"
"#,
        );
        assert!(matches!(cfg.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn rejects_zero_timeouts() {
        let cfg = parse(
            r#"
bridge:
  base_url: "https://bridge.example"
  store_timeout_secs: 0
"#,
        );
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_empty_api_key() {
        let cfg = parse(
            r#"
bridge:
  base_url: "https://bridge.example"
identity:
  url: "https://project.supabase.co"
  api_key: ""
"#,
        );
        assert!(cfg.validate().is_err());
    }
}
