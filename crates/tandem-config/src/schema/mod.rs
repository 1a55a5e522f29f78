//! Configuration schema types for Tandem.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod assistant;
mod logging;
mod openai;
mod session;

pub use assistant::*;
pub use logging::*;
pub use openai::*;
pub use session::*;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TandemConfig {
    pub openai: OpenAiSection,
    pub assistant: AssistantConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}
