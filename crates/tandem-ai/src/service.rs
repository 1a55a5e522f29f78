//! Remote collaborator interfaces.
//!
//! The remote service owns assistants, threads, runs and messages; the core
//! only holds ids and the last snapshot it fetched. Polling and backoff are
//! the implementation's business: `*_and_poll` calls return once the run has
//! left its transient states.

use async_trait::async_trait;

use crate::thread::{
    AssistantDef, AssistantParams, MessageCreate, MessagePage, Run, Thread, ThreadParams,
    ToolOutput,
};
use crate::AiError;

#[async_trait]
pub trait AssistantDirectory: Send + Sync {
    /// Retrieve by id or create from parameters.
    async fn resolve_assistant(&self, params: &AssistantParams) -> Result<AssistantDef, AiError>;

    /// Retrieve by id or create from parameters.
    async fn resolve_thread(&self, params: &ThreadParams) -> Result<Thread, AiError>;
}

#[async_trait]
pub trait RunService: Send + Sync {
    async fn create_message(&self, thread_id: &str, message: &MessageCreate)
        -> Result<(), AiError>;

    /// Start a run and wait until it is no longer queued or in progress.
    async fn create_run_and_poll(&self, thread_id: &str, assistant_id: &str)
        -> Result<Run, AiError>;

    /// Submit one output per pending call and wait for the next stable status.
    async fn submit_tool_outputs_and_poll(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<Run, AiError>;

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<(), AiError>;
}

#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Messages of a thread in insertion order (oldest first).
    async fn list_messages(&self, thread_id: &str) -> Result<MessagePage, AiError>;
}

/// Everything an [`crate::Assistant`] needs from the remote side.
pub trait AssistantBackend: AssistantDirectory + RunService + MessageStore {}

impl<T> AssistantBackend for T where T: AssistantDirectory + RunService + MessageStore {}
