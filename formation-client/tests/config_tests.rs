use formation_client::config::{ClientConfig, ConfigError, LogFormat, DEFAULT_STORAGE_KEY};
use proptest::prelude::*;

const BASE_TOML: &str = r#"
api_base_url = "http://localhost:8080"
request_timeout_ms = 5000

[session]
storage_path = "tmp/formation-session.json"

[logging]
filter = "info,formation_console=debug"
format = "pretty"
"#;

fn base_config() -> ClientConfig {
    ClientConfig::from_toml_str(BASE_TOML).unwrap()
}

#[test]
fn parses_minimal_config_with_default_storage_key() {
    let config = base_config();
    assert_eq!(config.session.storage_key, DEFAULT_STORAGE_KEY);
    assert_eq!(config.logging.format, LogFormat::Pretty);
    assert!(config.validate().is_ok());
}

#[test]
fn rejects_unknown_fields() {
    let contents = format!("{}\nextra = true\n", BASE_TOML);
    assert!(matches!(
        ClientConfig::from_toml_str(&contents),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn rejects_unknown_log_format() {
    let contents = BASE_TOML.replace("\"pretty\"", "\"xml\"");
    assert!(ClientConfig::from_toml_str(&contents).is_err());
}

#[test]
fn config_requires_http_base_url() {
    let mut config = base_config();
    config.api_base_url = "   ".to_string();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue { field: "api_base_url", .. })
    ));
    config.api_base_url = "ftp://localhost".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn config_requires_storage_key() {
    let mut config = base_config();
    config.session.storage_key = String::new();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue { field: "session.storage_key", .. })
    ));
}

#[test]
fn loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("formation.toml");
    std::fs::write(&path, BASE_TOML.replace("pretty", "json")).unwrap();
    let config = ClientConfig::from_path(&path).unwrap();
    assert_eq!(config.logging.format, LogFormat::Json);
}

proptest! {
    #[test]
    fn positive_timeouts_are_valid(timeout in 1u64..600_000) {
        let mut config = base_config();
        config.request_timeout_ms = timeout;
        prop_assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_timeout_is_rejected(port in 1u16..u16::MAX) {
        let mut config = base_config();
        config.api_base_url = format!("http://localhost:{}", port);
        config.request_timeout_ms = 0;
        prop_assert!(config.validate().is_err());
    }
}
