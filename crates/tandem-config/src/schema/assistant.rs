use serde::{Deserialize, Serialize};

/// Which assistant to talk to, and on which thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Reuse an existing assistant instead of creating one.
    pub id: Option<String>,
    pub name: String,
    pub model: String,
    pub instructions: Option<String>,
    /// Resume an existing thread instead of starting a new one.
    pub thread_id: Option<String>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            id: None,
            name: "tandem".into(),
            model: "gpt-4o-mini".into(),
            instructions: None,
            thread_id: None,
        }
    }
}
