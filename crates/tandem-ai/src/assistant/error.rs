use crate::messages::ExtractError;
use crate::AiError;

/// Failures that end a single turn inside the run driver.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Service(#[from] AiError),

    #[error("Run {run_id} requires tool calls but no tools were available.")]
    MissingToolkit { run_id: String },

    #[error("Run {run_id} had status requires_action but provided no action.")]
    NoActionProvided { run_id: String },

    #[error("Failed to complete tool call: {source}")]
    ToolResolution {
        run_id: String,
        #[source]
        source: AiError,
    },

    #[error("Run {run_id} still requires action after {max_rounds} tool rounds.")]
    TooManyToolRounds { run_id: String, max_rounds: u32 },

    #[error("Failed to get text response: {source}")]
    NoAssistantMessage {
        run_id: String,
        #[source]
        source: ExtractError,
    },
}

impl RunError {
    /// The run this error belongs to, when one had been started.
    pub fn run_id(&self) -> Option<&str> {
        match self {
            Self::Service(_) => None,
            Self::MissingToolkit { run_id }
            | Self::NoActionProvided { run_id }
            | Self::ToolResolution { run_id, .. }
            | Self::TooManyToolRounds { run_id, .. }
            | Self::NoAssistantMessage { run_id, .. } => Some(run_id),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("Cannot send a new message while a run is in progress.")]
    RunInProgress,

    #[error("Cannot set a new thread while a run is in progress.")]
    SetThreadInProgress,

    #[error("failed to initialize assistant {name}: {source}")]
    Initialization {
        name: String,
        #[source]
        source: AiError,
    },

    #[error("run failed: {0}")]
    RunFailed(#[from] RunError),
}

impl AssistantError {
    /// Caller-facing error list: this error first, then each cause.
    pub fn errors(&self) -> Vec<String> {
        let mut errors = vec![self.to_string()];
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            errors.push(err.to_string());
            source = err.source();
        }
        errors
    }

    /// True for the "already busy" rejections; retrying later may succeed.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::RunInProgress | Self::SetThreadInProgress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    #[test]
    fn run_in_progress_message() {
        let err = AssistantError::RunInProgress;
        assert_eq!(
            err.errors(),
            vec!["Cannot send a new message while a run is in progress.".to_string()]
        );
        assert!(err.is_conflict());
    }

    #[test]
    fn run_failed_wraps_cause() {
        let err: AssistantError = RunError::ToolResolution {
            run_id: "run_1".into(),
            source: AiError::Timeout,
        }
        .into();
        assert_eq!(
            err.errors(),
            vec![
                "run failed: Failed to complete tool call: Timeout".to_string(),
                "Failed to complete tool call: Timeout".to_string(),
                "Timeout".to_string(),
            ]
        );
        assert!(!err.is_conflict());
    }

    #[test]
    fn no_assistant_message_keeps_extraction_context() {
        let err = RunError::NoAssistantMessage {
            run_id: "run_9".into(),
            source: ExtractError::NoMessagesByRole {
                run_id: "run_9".into(),
                role: Role::Assistant,
            },
        };
        assert_eq!(err.run_id(), Some("run_9"));
        assert!(err.to_string().contains("No messages in run run_9 by role assistant."));
    }
}
