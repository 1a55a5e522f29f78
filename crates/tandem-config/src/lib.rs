//! Tandem configuration system.
//!
//! TOML-based configuration with validation. All sections use serde
//! defaults so a partial file, or none at all, works out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tandem_config::load_config;
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("model: {}", config.assistant.model);
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{AssistantConfig, LoggingConfig, OpenAiSection, SessionConfig, TandemConfig};

use std::path::Path;

use tandem_common::ConfigError;

/// Load and validate the config.
///
/// With `path`, that file must exist. Without, the platform default is used
/// and created on first run.
pub fn load_config(path: Option<&Path>) -> Result<TandemConfig, ConfigError> {
    let config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };
    validation::validate(&config)?;
    Ok(config)
}
