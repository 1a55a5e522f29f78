//! Remote-service objects: assistants, threads, runs and messages.
//!
//! Shapes follow the Assistants v2 wire format so the HTTP backend can
//! deserialize them directly; the core only reads them.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        };
        f.write_str(name)
    }
}

/// Either an existing assistant id or the parameters to create one.
#[derive(Debug, Clone)]
pub enum AssistantParams {
    Existing { id: String },
    Create(AssistantCreateParams),
}

impl AssistantParams {
    pub fn existing(id: impl Into<String>) -> Self {
        Self::Existing { id: id.into() }
    }
}

impl From<AssistantCreateParams> for AssistantParams {
    fn from(params: AssistantCreateParams) -> Self {
        Self::Create(params)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AssistantCreateParams {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Value>,
}

impl AssistantCreateParams {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Function-tool descriptors, usually from [`crate::Toolkit::function_tools`].
    pub fn with_tools(mut self, tools: Vec<Value>) -> Self {
        self.tools = tools;
        self
    }
}

/// Either an existing thread id or the parameters to create one.
#[derive(Debug, Clone)]
pub enum ThreadParams {
    Existing { id: String },
    Create(ThreadCreateParams),
}

impl ThreadParams {
    pub fn existing(id: impl Into<String>) -> Self {
        Self::Existing { id: id.into() }
    }

    /// A fresh, empty thread.
    pub fn new_thread() -> Self {
        Self::Create(ThreadCreateParams::default())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ThreadCreateParams {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<MessageCreate>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

/// Remote assistant definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantDef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub tools: Vec<Value>,
}

/// Remote conversation thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,
}

impl Thread {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: 0,
            metadata: None,
        }
    }
}

/// A message to append to a thread.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageCreate {
    pub role: Role,
    pub content: String,
}

impl MessageCreate {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

impl From<&str> for MessageCreate {
    fn from(content: &str) -> Self {
        Self::user(content)
    }
}

impl From<String> for MessageCreate {
    fn from(content: String) -> Self {
        Self::user(content)
    }
}

/// A message stored on a thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(default)]
    pub thread_id: String,
    pub role: Role,
    /// Run that produced this message; `None` for caller-authored messages.
    #[serde(default)]
    pub run_id: Option<String>,
    #[serde(default)]
    pub content: Vec<MessageContent>,
    #[serde(default)]
    pub created_at: i64,
}

impl Message {
    /// A single text-block message.
    pub fn new(
        id: impl Into<String>,
        role: Role,
        run_id: Option<&str>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            thread_id: String::new(),
            role,
            run_id: run_id.map(String::from),
            content: vec![MessageContent::Text {
                text: MessageText {
                    value: text.into(),
                    annotations: Vec::new(),
                },
            }],
            created_at: 0,
        }
    }

    /// All text blocks joined with newlines; non-text blocks are skipped.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(crate::messages::text_content)
            .map(|t| t.value.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn belongs_to_run(&self, run_id: &str) -> bool {
        self.run_id.as_deref() == Some(run_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: MessageText },
    Refusal { refusal: String },
    /// Images, file references and anything newer than this client.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageText {
    pub value: String,
    #[serde(default)]
    pub annotations: Vec<Value>,
}

/// One page of thread messages, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessagePage {
    pub data: Vec<Message>,
    #[serde(default)]
    pub has_more: bool,
}

impl MessagePage {
    pub fn new(data: Vec<Message>) -> Self {
        Self {
            data,
            has_more: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
    /// A status newer than this client. Polling stops on it.
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// The service is still working; keep polling.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Queued | Self::InProgress | Self::Cancelling)
    }

    /// The run is over and will not change again.
    pub fn is_terminal(&self) -> bool {
        !self.is_transient() && *self != Self::RequiresAction
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::RequiresAction => "requires_action",
            Self::Cancelling => "cancelling",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
            Self::Completed => "completed",
            Self::Incomplete => "incomplete",
            Self::Expired => "expired",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// A model execution attached to a thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub id: String,
    #[serde(default)]
    pub thread_id: String,
    #[serde(default)]
    pub assistant_id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub required_action: Option<RequiredAction>,
    #[serde(default)]
    pub last_error: Option<RunLastError>,
}

impl Run {
    pub fn new(id: impl Into<String>, status: RunStatus) -> Self {
        Self {
            id: id.into(),
            thread_id: String::new(),
            assistant_id: String::new(),
            status,
            required_action: None,
            last_error: None,
        }
    }

    /// A run in `requires_action` waiting on the given calls.
    pub fn requiring_action(id: impl Into<String>, tool_calls: Vec<ToolCallRequest>) -> Self {
        Self {
            required_action: Some(RequiredAction {
                kind: "submit_tool_outputs".to_string(),
                submit_tool_outputs: SubmitToolOutputs { tool_calls },
            }),
            ..Self::new(id, RunStatus::RequiresAction)
        }
    }

    /// Tool calls the run is waiting on, if it is in `requires_action`.
    pub fn pending_tool_calls(&self) -> Option<&[ToolCallRequest]> {
        if self.status != RunStatus::RequiresAction {
            return None;
        }
        self.required_action
            .as_ref()
            .map(|action| action.submit_tool_outputs.tool_calls.as_slice())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequiredAction {
    #[serde(rename = "type")]
    pub kind: String,
    pub submit_tool_outputs: SubmitToolOutputs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitToolOutputs {
    pub tool_calls: Vec<ToolCallRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunLastError {
    pub code: String,
    pub message: String,
}

impl fmt::Display for RunLastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A model-issued request to invoke a named tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub id: String,
    #[serde(rename = "type", default = "function_kind")]
    pub kind: String,
    pub function: FunctionCall,
}

fn function_kind() -> String {
    "function".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// Raw JSON argument payload as produced by the model.
    pub arguments: String,
}

impl ToolCallRequest {
    pub fn function(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: function_kind(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }

    pub fn arguments(&self) -> &str {
        &self.function.arguments
    }
}

/// Textual result for one tool call, matched by call id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub tool_call_id: String,
    pub output: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_deserializes_required_action() {
        let json = serde_json::json!({
            "id": "run_1",
            "object": "thread.run",
            "thread_id": "thread_1",
            "assistant_id": "asst_1",
            "status": "requires_action",
            "required_action": {
                "type": "submit_tool_outputs",
                "submit_tool_outputs": {
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": { "name": "get_weather", "arguments": "{\"city\":\"Oslo\"}" }
                    }]
                }
            },
            "last_error": null
        });
        let run: Run = serde_json::from_value(json).unwrap();
        let calls = run.pending_tool_calls().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name(), "get_weather");
        assert_eq!(calls[0].arguments(), "{\"city\":\"Oslo\"}");
    }

    #[test]
    fn pending_tool_calls_only_when_requiring_action() {
        let mut run = Run::requiring_action("run_1", vec![ToolCallRequest::function("c", "t", "{}")]);
        assert!(run.pending_tool_calls().is_some());
        run.status = RunStatus::Completed;
        assert!(run.pending_tool_calls().is_none());
    }

    #[test]
    fn status_classification() {
        assert!(RunStatus::Queued.is_transient());
        assert!(RunStatus::Cancelling.is_transient());
        assert!(!RunStatus::RequiresAction.is_transient());
        assert!(!RunStatus::RequiresAction.is_terminal());
        assert!(RunStatus::Completed.is_terminal());
        assert!(RunStatus::Expired.is_terminal());
        assert_eq!(RunStatus::RequiresAction.to_string(), "requires_action");
    }

    #[test]
    fn unrecognized_status_parses_as_unknown() {
        let run: Run = serde_json::from_value(serde_json::json!({
            "id": "run_1",
            "status": "paused_for_review"
        }))
        .unwrap();
        assert_eq!(run.status, RunStatus::Unknown);
        assert!(!run.status.is_transient());
        assert!(run.status.is_terminal());
        assert!(run.pending_tool_calls().is_none());
    }

    #[test]
    fn message_text_skips_non_text_blocks() {
        let json = serde_json::json!({
            "id": "msg_1",
            "thread_id": "thread_1",
            "role": "assistant",
            "run_id": "run_1",
            "content": [
                { "type": "text", "text": { "value": "It is", "annotations": [] } },
                { "type": "image_file", "image_file": { "file_id": "file_1" } },
                { "type": "text", "text": { "value": "72F", "annotations": [] } }
            ]
        });
        let message: Message = serde_json::from_value(json).unwrap();
        assert_eq!(message.content.len(), 3);
        assert_eq!(message.content[1], MessageContent::Other);
        assert_eq!(message.text(), "It is\n72F");
        assert!(message.belongs_to_run("run_1"));
    }

    #[test]
    fn assistant_create_params_skip_empty_fields() {
        let params = AssistantCreateParams::new("gpt-4o-mini").with_name("helper");
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json, serde_json::json!({ "model": "gpt-4o-mini", "name": "helper" }));
    }
}
