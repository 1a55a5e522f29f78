//! Expose an assistant as a tool of another assistant.

use std::sync::Arc;

use serde::Deserialize;

use crate::toolkit::{Tool, ToolConfig, ToolError};

use super::session::Assistant;

#[derive(Deserialize)]
struct DelegateArgs {
    message: String,
}

/// Descriptor for a tool that forwards a message to another [`Assistant`]
/// and returns its reply text.
#[derive(Debug, Clone)]
pub struct AssistantTool {
    pub name: String,
    pub description: String,
    pub message_description: String,
}

impl AssistantTool {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            message_description: "The message to send to the assistant.".to_string(),
        }
    }

    pub fn with_message_description(mut self, description: impl Into<String>) -> Self {
        self.message_description = description.into();
        self
    }

    pub fn config(&self) -> ToolConfig {
        ToolConfig::new(&self.name, &self.description).with_parameters(serde_json::json!({
            "type": "object",
            "properties": {
                "message": {
                    "type": "string",
                    "description": self.message_description,
                }
            },
            "required": ["message"]
        }))
    }

    /// Bind the descriptor to `assistant`.
    ///
    /// The delegate keeps its own busy flag: a nested call made while it is
    /// already answering fails with a tool error instead of queueing.
    pub fn build(self, assistant: Arc<Assistant>) -> Tool {
        Tool::typed(self.config(), move |args: DelegateArgs| {
            let assistant = Arc::clone(&assistant);
            async move {
                let reply = assistant
                    .message(args.message)
                    .await
                    .map_err(|e| ToolError::failed(e.to_string()))?;
                Ok(Some(reply.text()))
            }
        })
    }
}
