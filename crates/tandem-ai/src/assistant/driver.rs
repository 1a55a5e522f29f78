//! One conversational turn: append, run, resolve tool calls, extract the reply.

use std::sync::{Mutex, PoisonError};

use tracing::{debug, warn};

use crate::messages::expected_last_message;
use crate::service::AssistantBackend;
use crate::thread::{Message, MessageCreate, Run, RunStatus, ToolCallRequest, ToolOutput};
use crate::toolkit::Toolkit;

use super::error::RunError;
use super::types::{ProgressEvent, ProgressHandler, ProgressKind};

/// Borrowed view of a session for the duration of one turn.
pub(crate) struct RunDriver<'a> {
    pub backend: &'a dyn AssistantBackend,
    pub thread_id: &'a str,
    pub assistant_id: &'a str,
    pub assistant_name: &'a str,
    pub toolkit: Option<&'a Toolkit>,
    pub progress: Option<&'a ProgressHandler>,
    pub max_tool_rounds: u32,
    /// Updated with every run snapshot the service returns.
    pub active_run: &'a Mutex<Option<Run>>,
}

impl RunDriver<'_> {
    /// Append `message`, run the assistant until it settles, and return the
    /// last assistant-authored message of that run.
    pub async fn drive(&self, message: &MessageCreate) -> Result<Message, RunError> {
        debug!(thread_id = self.thread_id, "Appending message to thread");
        self.backend.create_message(self.thread_id, message).await?;

        let run = self
            .backend
            .create_run_and_poll(self.thread_id, self.assistant_id)
            .await?;
        self.observe(&run);

        let run = self.resolve_tool_calls(run).await?;
        if run.status != RunStatus::Completed {
            match &run.last_error {
                Some(last_error) => {
                    warn!(run_id = %run.id, status = %run.status, error = %last_error, "Run did not complete")
                }
                None => warn!(run_id = %run.id, status = %run.status, "Run did not complete"),
            }
        }

        let page = self.backend.list_messages(self.thread_id).await?;
        let reply = expected_last_message(&page, &run.id).map_err(|source| {
            RunError::NoAssistantMessage {
                run_id: run.id.clone(),
                source,
            }
        })?;
        debug!(run_id = %run.id, message_id = %reply.id, "Turn complete");
        Ok(reply.clone())
    }

    /// Submit tool outputs until the run leaves `requires_action`.
    async fn resolve_tool_calls(&self, mut run: Run) -> Result<Run, RunError> {
        let mut rounds = 0u32;

        while run.status == RunStatus::RequiresAction {
            let run_id = run.id.clone();

            let Some(toolkit) = self.toolkit else {
                return Err(RunError::MissingToolkit { run_id });
            };
            let Some(calls) = run.pending_tool_calls() else {
                self.cancel(&run_id).await;
                return Err(RunError::NoActionProvided { run_id });
            };
            if rounds >= self.max_tool_rounds {
                warn!(run_id = %run_id, max_rounds = self.max_tool_rounds, "Too many tool rounds");
                self.cancel(&run_id).await;
                return Err(RunError::TooManyToolRounds {
                    run_id,
                    max_rounds: self.max_tool_rounds,
                });
            }
            rounds += 1;

            debug!(run_id = %run_id, round = rounds, calls = calls.len(), "Resolving tool calls");
            let outputs = self.tool_outputs(toolkit, calls).await;

            run = match self
                .backend
                .submit_tool_outputs_and_poll(self.thread_id, &run_id, &outputs)
                .await
            {
                Ok(next) => next,
                Err(source) => {
                    warn!(run_id = %run_id, error = %source, "Submitting tool outputs failed");
                    self.cancel(&run_id).await;
                    return Err(RunError::ToolResolution { run_id, source });
                }
            };
            self.observe(&run);
        }

        Ok(run)
    }

    /// One output per call, in call order. Failures become output text.
    async fn tool_outputs(&self, toolkit: &Toolkit, calls: &[ToolCallRequest]) -> Vec<ToolOutput> {
        let mut outputs = Vec::with_capacity(calls.len());
        for call in calls {
            self.report(ProgressEvent::new(
                ProgressKind::ToolCall,
                format!(
                    "TOOL CALL: {}\nARGUMENTS: {}\nBY ASSISTANT: {}",
                    call.name(),
                    call.arguments(),
                    self.assistant_name
                ),
            ));

            let output = self.tool_output(toolkit, call).await;
            self.report(ProgressEvent::new(ProgressKind::ToolResponse, output.clone()));

            outputs.push(ToolOutput {
                tool_call_id: call.id.clone(),
                output,
            });
        }
        outputs
    }

    async fn tool_output(&self, toolkit: &Toolkit, call: &ToolCallRequest) -> String {
        let name = call.name();
        let Some(tool) = toolkit.get(name) else {
            warn!(tool = name, "Model called an unregistered tool");
            return format!("Unrecognized tool call: {name}");
        };

        debug!(tool = name, call_id = %call.id, "Executing tool");
        match tool.call(call.arguments()).await {
            Ok(Some(output)) if !output.is_empty() => output,
            Ok(_) => format!("Received no output from tool {name}"),
            Err(e) => {
                warn!(tool = name, error = %e, "Tool call failed");
                format!("Failed to complete tool call: {e}")
            }
        }
    }

    /// Best effort; a failed cancel is logged and otherwise ignored.
    async fn cancel(&self, run_id: &str) {
        if let Err(e) = self.backend.cancel_run(self.thread_id, run_id).await {
            warn!(run_id, error = %e, "Failed to cancel run");
        }
    }

    fn observe(&self, run: &Run) {
        debug!(run_id = %run.id, status = %run.status, "Run settled");
        *self
            .active_run
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(run.clone());
    }

    fn report(&self, event: ProgressEvent) {
        if let Some(report) = self.progress {
            report(event);
        }
    }
}
