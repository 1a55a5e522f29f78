//! Service trait implementations for OpenAiClient.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::service::{AssistantDirectory, MessageStore, RunService};
use crate::thread::{
    AssistantDef, AssistantParams, Message, MessageCreate, MessagePage, Run, Thread, ThreadParams,
    ToolOutput,
};
use crate::AiError;

use super::client::OpenAiClient;

const MESSAGE_PAGE_LIMIT: u32 = 100;

/// Raw list envelope; `last_id` is the cursor for the next page.
#[derive(Deserialize)]
struct ListResponse<T> {
    data: Vec<T>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    last_id: Option<String>,
}

#[async_trait]
impl AssistantDirectory for OpenAiClient {
    async fn resolve_assistant(&self, params: &AssistantParams) -> Result<AssistantDef, AiError> {
        match params {
            AssistantParams::Existing { id } => self.get(&format!("/assistants/{id}")).await,
            AssistantParams::Create(create) => {
                let assistant: AssistantDef = self.post("/assistants", create).await?;
                info!(assistant_id = %assistant.id, model = %assistant.model, "Created assistant");
                Ok(assistant)
            }
        }
    }

    async fn resolve_thread(&self, params: &ThreadParams) -> Result<Thread, AiError> {
        match params {
            ThreadParams::Existing { id } => self.get(&format!("/threads/{id}")).await,
            ThreadParams::Create(create) => {
                let thread: Thread = self.post("/threads", create).await?;
                info!(thread_id = %thread.id, "Created thread");
                Ok(thread)
            }
        }
    }
}

#[async_trait]
impl RunService for OpenAiClient {
    async fn create_message(&self, thread_id: &str, message: &MessageCreate) -> Result<(), AiError> {
        let _: Value = self
            .post(&format!("/threads/{thread_id}/messages"), message)
            .await?;
        Ok(())
    }

    async fn create_run_and_poll(&self, thread_id: &str, assistant_id: &str) -> Result<Run, AiError> {
        let run: Run = self
            .post(
                &format!("/threads/{thread_id}/runs"),
                &json!({ "assistant_id": assistant_id }),
            )
            .await?;
        debug!(run_id = %run.id, status = %run.status, "Created run");
        self.poll_run(thread_id, run).await
    }

    async fn submit_tool_outputs_and_poll(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<Run, AiError> {
        let run: Run = self
            .post(
                &format!("/threads/{thread_id}/runs/{run_id}/submit_tool_outputs"),
                &json!({ "tool_outputs": outputs }),
            )
            .await?;
        debug!(run_id = %run.id, outputs = outputs.len(), "Submitted tool outputs");
        self.poll_run(thread_id, run).await
    }

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<(), AiError> {
        let run: Run = self
            .post(&format!("/threads/{thread_id}/runs/{run_id}/cancel"), &json!({}))
            .await?;
        debug!(run_id = %run.id, status = %run.status, "Cancelled run");
        Ok(())
    }
}

#[async_trait]
impl MessageStore for OpenAiClient {
    /// Fetches the whole thread, oldest first, following `after` cursors.
    /// That is one request per 100 messages on every turn, so long-lived
    /// threads get slower to settle as they grow.
    async fn list_messages(&self, thread_id: &str) -> Result<MessagePage, AiError> {
        let mut messages: Vec<Message> = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let path = message_list_path(thread_id, after.as_deref());
            let page: ListResponse<Message> = self.get(&path).await?;
            messages.extend(page.data);

            match page.last_id {
                Some(last_id) if page.has_more => after = Some(last_id),
                _ => break,
            }
        }

        debug!(thread_id, count = messages.len(), "Listed messages");
        Ok(MessagePage::new(messages))
    }
}

fn message_list_path(thread_id: &str, after: Option<&str>) -> String {
    let mut path = format!("/threads/{thread_id}/messages?order=asc&limit={MESSAGE_PAGE_LIMIT}");
    if let Some(after) = after {
        path.push_str("&after=");
        path.push_str(after);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thread::{Role, RunStatus};

    #[test]
    fn message_list_path_pages_forward() {
        assert_eq!(
            message_list_path("thread_1", None),
            "/threads/thread_1/messages?order=asc&limit=100"
        );
        assert_eq!(
            message_list_path("thread_1", Some("msg_9")),
            "/threads/thread_1/messages?order=asc&limit=100&after=msg_9"
        );
    }

    #[test]
    fn parses_run_waiting_on_tool_calls() {
        let run: Run = serde_json::from_value(json!({
            "id": "run_abc",
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
            "last_error": null,
            "model": "gpt-4o-mini"
        }))
        .unwrap();

        assert_eq!(run.status, RunStatus::RequiresAction);
        let calls = run.pending_tool_calls().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name(), "get_weather");
        assert_eq!(calls[0].arguments(), r#"{"city":"Oslo"}"#);
    }

    #[test]
    fn parses_failed_run_with_last_error() {
        let run: Run = serde_json::from_value(json!({
            "id": "run_abc",
            "status": "failed",
            "last_error": { "code": "rate_limit_exceeded", "message": "slow down" }
        }))
        .unwrap();

        assert!(run.status.is_terminal());
        assert_eq!(
            run.last_error.unwrap().to_string(),
            "rate_limit_exceeded: slow down"
        );
    }

    #[test]
    fn parses_message_list_page() {
        let page: ListResponse<Message> = serde_json::from_value(json!({
            "object": "list",
            "data": [
                {
                    "id": "msg_1",
                    "object": "thread.message",
                    "thread_id": "thread_1",
                    "role": "user",
                    "run_id": null,
                    "content": [{ "type": "text", "text": { "value": "hi", "annotations": [] } }],
                    "created_at": 1700000000
                },
                {
                    "id": "msg_2",
                    "object": "thread.message",
                    "thread_id": "thread_1",
                    "role": "assistant",
                    "run_id": "run_abc",
                    "content": [
                        { "type": "image_file", "image_file": { "file_id": "file_1" } },
                        { "type": "text", "text": { "value": "hello", "annotations": [] } }
                    ],
                    "created_at": 1700000001
                }
            ],
            "first_id": "msg_1",
            "last_id": "msg_2",
            "has_more": false
        }))
        .unwrap();

        assert!(!page.has_more);
        assert_eq!(page.last_id.as_deref(), Some("msg_2"));
        assert_eq!(page.data[1].role, Role::Assistant);
        assert!(page.data[1].belongs_to_run("run_abc"));
        assert_eq!(page.data[1].text(), "hello");
    }
}
