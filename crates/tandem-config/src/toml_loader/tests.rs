//! Tests for TOML config loading, creation, and path resolution.

use super::template::default_config_toml;
use super::*;
use crate::schema::TandemConfig;
use std::path::Path;
use tandem_common::ConfigError;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_tandem_config.toml"));
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[assistant]
id = "asst_123"
thread_id = "thread_456"

[session]
max_tool_rounds = 4
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.assistant.id.as_deref(), Some("asst_123"));
    assert_eq!(config.assistant.thread_id.as_deref(), Some("thread_456"));
    assert_eq!(config.session.max_tool_rounds, 4);
    // Defaults preserved
    assert_eq!(config.assistant.model, "gpt-4o-mini");
    assert_eq!(config.openai.api_key_env, "OPENAI_API_KEY");
    assert_eq!(config.openai.poll_interval_ms, 1000);
    assert_eq!(config.logging.level, "tandem=info");
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn load_from_path_keeps_invalid_values_for_the_caller() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[session]\nmax_tool_rounds = 0\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.session.max_tool_rounds, 0);

    let err = crate::load_config(Some(path.as_path())).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError(_)));
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tandem").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.assistant.name, "tandem");
    assert_eq!(config.session.max_tool_rounds, 10);
}

#[test]
fn default_config_toml_is_valid() {
    let config: TandemConfig = toml::from_str(default_config_toml()).unwrap();
    assert!(crate::validation::validate(&config).is_ok());
}

#[test]
fn default_config_path_is_reasonable() {
    // Some CI environments have no config dir at all.
    if let Ok(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("tandem"));
        assert!(path_str.ends_with("config.toml"));
    }
}
