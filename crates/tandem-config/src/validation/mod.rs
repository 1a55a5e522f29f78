//! Full configuration validation.
//!
//! Every check pushes onto a shared list; all problems are reported
//! together in a single `ConfigError`.

mod helpers;


use crate::schema::TandemConfig;
use helpers::{validate_range, validate_range_u64};
use tandem_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &TandemConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_openai(&mut errors, config);
    validate_assistant(&mut errors, config);
    validate_range(
        &mut errors,
        "session.max_tool_rounds",
        config.session.max_tool_rounds,
        1,
        100,
    );
    if config.logging.level.trim().is_empty() {
        errors.push("logging.level must not be empty".into());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_openai(errors: &mut Vec<String>, config: &TandemConfig) {
    let openai = &config.openai;
    if openai.api_key_env.trim().is_empty() {
        errors.push("openai.api_key_env must not be empty".into());
    }
    if let Some(url) = &openai.base_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(format!("openai.base_url = {url} must be an http(s) URL"));
        }
    }
    validate_range_u64(errors, "openai.poll_interval_ms", openai.poll_interval_ms, 1, 60_000);
    validate_range_u64(errors, "openai.run_timeout_secs", openai.run_timeout_secs, 1, 3_600);
    validate_range_u64(
        errors,
        "openai.request_timeout_secs",
        openai.request_timeout_secs,
        1,
        600,
    );
}

fn validate_assistant(errors: &mut Vec<String>, config: &TandemConfig) {
    let assistant = &config.assistant;
    if assistant.id.is_none() && assistant.model.trim().is_empty() {
        errors.push("assistant.model is required when assistant.id is not set".into());
    }
    if assistant.name.trim().is_empty() {
        errors.push("assistant.name must not be empty".into());
    }
}
