//! Assistant run coordination for tandem.
//!
//! Drives a conversational turn against a remote thread/run service:
//! - Tool registry with typed or validated arguments
//! - Assistant sessions guarding a single in-flight turn
//! - Run driver that resolves tool calls round by round
//! - Message extraction by run, role and position
//! - OpenAI Assistants (v2) backend

pub mod assistant;
pub mod messages;
pub mod openai;
pub mod service;
pub mod thread;
pub mod toolkit;

pub use assistant::{
    Assistant, AssistantError, AssistantOptions, AssistantTool, ProgressEvent, ProgressHandler,
    ProgressKind, RunError, DEFAULT_MAX_TOOL_ROUNDS,
};
pub use messages::{expected_last_message, select_message, ExtractError, MessageSpecifier, Position};
pub use openai::{OpenAiClient, OpenAiConfig};
pub use service::{AssistantBackend, AssistantDirectory, MessageStore, RunService};
pub use thread::{
    AssistantCreateParams, AssistantDef, AssistantParams, Message, MessageContent, MessageCreate,
    MessagePage, Role, Run, RunStatus, Thread, ThreadCreateParams, ThreadParams, ToolCallRequest,
    ToolOutput,
};
pub use toolkit::{Tool, ToolConfig, ToolError, Toolkit};

/// Transport-level failures talking to the remote service.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timeout")]
    Timeout,
}
