//! Assistant session: one assistant, one thread, one turn at a time.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tandem_common::new_correlation_id;
use tracing::{info, info_span, warn, Instrument};

use crate::service::AssistantBackend;
use crate::thread::{AssistantDef, AssistantParams, Message, MessageCreate, Run, Thread, ThreadParams};
use crate::toolkit::Toolkit;

use super::driver::RunDriver;
use super::error::AssistantError;
use super::types::{BusyGuard, ProgressEvent, ProgressHandler, ProgressKind};

/// Tool-call rounds allowed per turn unless configured otherwise.
pub const DEFAULT_MAX_TOOL_ROUNDS: u32 = 10;

/// How to build an [`Assistant`].
#[derive(Clone)]
pub struct AssistantOptions {
    pub name: String,
    pub assistant: AssistantParams,
    pub thread: ThreadParams,
    pub toolkit: Option<Arc<Toolkit>>,
    pub progress: Option<ProgressHandler>,
    pub max_tool_rounds: u32,
}

impl AssistantOptions {
    pub fn new(name: impl Into<String>, assistant: AssistantParams, thread: ThreadParams) -> Self {
        Self {
            name: name.into(),
            assistant,
            thread,
            toolkit: None,
            progress: None,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }

    pub fn with_toolkit(mut self, toolkit: Arc<Toolkit>) -> Self {
        self.toolkit = Some(toolkit);
        self
    }

    pub fn with_progress_handler(mut self, handler: ProgressHandler) -> Self {
        self.progress = Some(handler);
        self
    }

    pub fn with_max_tool_rounds(mut self, rounds: u32) -> Self {
        self.max_tool_rounds = rounds;
        self
    }
}

impl fmt::Debug for AssistantOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssistantOptions")
            .field("name", &self.name)
            .field("assistant", &self.assistant)
            .field("thread", &self.thread)
            .field("toolkit", &self.toolkit)
            .field("progress", &self.progress.is_some())
            .field("max_tool_rounds", &self.max_tool_rounds)
            .finish()
    }
}

/// A conversational session bound to a remote assistant and thread.
///
/// At most one turn runs at a time. A second [`Assistant::message`] or a
/// [`Assistant::set_thread`] issued while a turn is in flight is rejected
/// without touching the remote service.
pub struct Assistant {
    backend: Arc<dyn AssistantBackend>,
    assistant: AssistantDef,
    thread: Mutex<Thread>,
    name: String,
    toolkit: Option<Arc<Toolkit>>,
    progress: Option<ProgressHandler>,
    max_tool_rounds: u32,
    busy: AtomicBool,
    active_run: Mutex<Option<Run>>,
}

impl Assistant {
    /// Resolve the assistant and the thread concurrently and build a session.
    pub async fn create(
        backend: Arc<dyn AssistantBackend>,
        options: AssistantOptions,
    ) -> Result<Self, AssistantError> {
        let AssistantOptions {
            name,
            assistant,
            thread,
            toolkit,
            progress,
            max_tool_rounds,
        } = options;

        let resolved = tokio::try_join!(
            backend.resolve_assistant(&assistant),
            backend.resolve_thread(&thread),
        );
        let (assistant, thread) = match resolved {
            Ok(pair) => pair,
            Err(source) => {
                warn!(assistant = %name, error = %source, "Assistant initialization failed");
                return Err(AssistantError::Initialization { name, source });
            }
        };

        info!(
            assistant = %name,
            assistant_id = %assistant.id,
            thread_id = %thread.id,
            tools = toolkit.as_ref().map_or(0, |t| t.len()),
            "Assistant ready"
        );

        Ok(Self {
            backend,
            assistant,
            thread: Mutex::new(thread),
            name,
            toolkit,
            progress,
            max_tool_rounds,
            busy: AtomicBool::new(false),
            active_run: Mutex::new(None),
        })
    }

    /// Send a user message and return the assistant's reply for this turn.
    ///
    /// Tool calls requested by the model are resolved against the toolkit
    /// until the run settles. The busy flag is cleared however the turn ends.
    pub async fn message(
        &self,
        message: impl Into<MessageCreate>,
    ) -> Result<Message, AssistantError> {
        let _guard = BusyGuard::acquire(&self.busy)?;
        let message = message.into();

        let span = info_span!("turn", assistant = %self.name, turn = %new_correlation_id());
        let result = self.run_turn(&message).instrument(span).await;

        match &result {
            Ok(reply) => self.report(ProgressEvent::new(ProgressKind::AssistantResponse, reply.text())),
            Err(e) => {
                warn!(assistant = %self.name, error = %e, "Turn failed");
                self.report(ProgressEvent::error(e.to_string(), e.errors()));
            }
        }
        result
    }

    async fn run_turn(&self, message: &MessageCreate) -> Result<Message, AssistantError> {
        let thread_id = self.lock_thread().id.clone();
        let driver = RunDriver {
            backend: self.backend.as_ref(),
            thread_id: &thread_id,
            assistant_id: &self.assistant.id,
            assistant_name: &self.name,
            toolkit: self.toolkit.as_deref(),
            progress: self.progress.as_ref(),
            max_tool_rounds: self.max_tool_rounds,
            active_run: &self.active_run,
        };
        Ok(driver.drive(message).await?)
    }

    /// Switch to another thread. Refused while a turn is in flight.
    pub fn set_thread(&self, thread: Thread) -> Result<Thread, AssistantError> {
        let Ok(_guard) = BusyGuard::acquire(&self.busy) else {
            warn!(assistant = %self.name, "Refusing to switch threads during a run");
            return Err(AssistantError::SetThreadInProgress);
        };
        info!(assistant = %self.name, thread_id = %thread.id, "Switching thread");
        *self.lock_thread() = thread.clone();
        Ok(thread)
    }

    pub fn thread(&self) -> Thread {
        self.lock_thread().clone()
    }

    pub fn assistant(&self) -> &AssistantDef {
        &self.assistant
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Latest run snapshot seen by this session, if any.
    pub fn active_run(&self) -> Option<Run> {
        self.active_run
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn toolkit(&self) -> Option<&Arc<Toolkit>> {
        self.toolkit.as_ref()
    }

    pub fn max_tool_rounds(&self) -> u32 {
        self.max_tool_rounds
    }

    fn lock_thread(&self) -> MutexGuard<'_, Thread> {
        self.thread.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn report(&self, event: ProgressEvent) {
        if let Some(report) = &self.progress {
            report(event);
        }
    }
}

impl fmt::Debug for Assistant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assistant")
            .field("name", &self.name)
            .field("assistant_id", &self.assistant.id)
            .field("thread_id", &self.lock_thread().id)
            .field("busy", &self.is_busy())
            .finish()
    }
}
