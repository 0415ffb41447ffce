use auth_bridge::bridge::BridgeSettings;
use auth_bridge::config::{AppConfig, ConfigError};
use config::Config;
use std::time::Duration;

fn parse(yaml: &str) -> AppConfig {
    Config::builder()
        .add_source(config::File::from_str(yaml, config::FileFormat::Yaml))
        .build()
        .expect("Failed to build config")
        .try_deserialize()
        .expect("Failed to deserialize app config")
}

#[test]
fn test_full_config_deserialization() {
    let config = parse(
        r#"
database_url: "postgres://localhost/bridge"
listen_addr: "127.0.0.1:9000"
bridge:
  base_url: "https://bridge.example"
  provider: "gitlab"
  default_expires_in: 600
  backend_timeout_secs: 3
  store_timeout_secs: 2
identity:
  url: "https://project.id.example"
  api_key: "anon-key"
"#,
    );

    assert!(config.validate().is_ok());
    assert_eq!(
        config.database_url.as_deref(),
        Some("postgres://localhost/bridge")
    );
    assert_eq!(config.listen_addr.to_string(), "127.0.0.1:9000");
    assert_eq!(config.bridge.base_url.as_str(), "https://bridge.example/");
    assert_eq!(config.bridge.provider, "gitlab");

    let identity = config.identity.as_ref().expect("identity section");
    assert_eq!(identity.url.host_str(), Some("project.id.example"));
    assert_eq!(identity.api_key, "anon-key");

    let settings = BridgeSettings::from(&config.bridge);
    assert_eq!(settings.provider, "gitlab");
    assert_eq!(settings.default_expires_in, 600);
    assert_eq!(settings.backend_timeout, Duration::from_secs(3));
    assert_eq!(settings.store_timeout, Duration::from_secs(2));
}

#[test]
fn test_missing_bridge_section_fails() {
    let result = Config::builder()
        .add_source(config::File::from_str(
            r#"database_url: "sqlite::memory:""#,
            config::FileFormat::Yaml,
        ))
        .build()
        .expect("Failed to build config")
        .try_deserialize::<AppConfig>();

    assert!(result.is_err());
}

#[test]
fn test_invalid_base_url_fails_deserialization() {
    let result = Config::builder()
        .add_source(config::File::from_str(
            "bridge:\n  base_url: \"not a url\"\n",
            config::FileFormat::Yaml,
        ))
        .build()
        .expect("Failed to build config")
        .try_deserialize::<AppConfig>();

    assert!(result.is_err());
}

#[test]
fn test_non_positive_default_lifetime_rejected() {
    let config = parse(
        r#"
bridge:
  base_url: "https://bridge.example"
  default_expires_in: 0
"#,
    );

    match config.validate() {
        Err(ConfigError::Validation(message)) => {
            assert!(message.contains("default_expires_in"))
        }
        other => panic!("Unexpected result: {other:?}"),
    }
}

#[test]
fn test_blank_provider_rejected() {
    let config = parse(
        r#"
bridge:
  base_url: "https://bridge.example"
  provider: "  "
"#,
    );

    assert!(config.validate().is_err());
}
