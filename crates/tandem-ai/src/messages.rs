//! Message selection within a run.
//!
//! Pure lookups over a [`MessagePage`]: narrow to one run, then one role,
//! then pick a position. Each failure says which step came up empty.

use std::fmt;

use crate::thread::{Message, MessageContent, MessagePage, MessageText, Role};

/// Which message of the filtered sequence to pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    First,
    Last,
    /// Zero-based index into the filtered sequence.
    Index(usize),
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::First => f.write_str("first"),
            Position::Last => f.write_str("last"),
            Position::Index(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSpecifier {
    pub run_id: String,
    pub role: Role,
    pub position: Position,
}

impl MessageSpecifier {
    pub fn new(run_id: impl Into<String>, role: Role, position: Position) -> Self {
        Self {
            run_id: run_id.into(),
            role,
            position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("No messages in run {run_id}.")]
    EmptyRun { run_id: String },

    #[error("No messages in run {run_id} by role {role}.")]
    NoMessagesByRole { run_id: String, role: Role },

    #[error("No message {index} in run {run_id} by role {role} ({available} available).")]
    IndexOutOfRange {
        run_id: String,
        role: Role,
        index: usize,
        available: usize,
    },
}

/// Select one message from `page` according to `specifier`.
///
/// The page is assumed to be in insertion order, so `Last` is the most
/// recently added match.
pub fn select_message<'a>(
    page: &'a MessagePage,
    specifier: &MessageSpecifier,
) -> Result<&'a Message, ExtractError> {
    let in_run: Vec<&Message> = page
        .data
        .iter()
        .filter(|m| m.belongs_to_run(&specifier.run_id))
        .collect();
    if in_run.is_empty() {
        return Err(ExtractError::EmptyRun {
            run_id: specifier.run_id.clone(),
        });
    }

    let by_role: Vec<&Message> = in_run
        .into_iter()
        .filter(|m| m.role == specifier.role)
        .collect();

    let (Some(first), Some(last)) = (by_role.first(), by_role.last()) else {
        return Err(ExtractError::NoMessagesByRole {
            run_id: specifier.run_id.clone(),
            role: specifier.role,
        });
    };

    match specifier.position {
        Position::First => Ok(*first),
        Position::Last => Ok(*last),
        Position::Index(index) => {
            by_role
                .get(index)
                .copied()
                .ok_or_else(|| ExtractError::IndexOutOfRange {
                    run_id: specifier.run_id.clone(),
                    role: specifier.role,
                    index,
                    available: by_role.len(),
                })
        }
    }
}

/// The last assistant message produced by `run_id`.
pub fn expected_last_message<'a>(
    page: &'a MessagePage,
    run_id: &str,
) -> Result<&'a Message, ExtractError> {
    select_message(
        page,
        &MessageSpecifier::new(run_id, Role::Assistant, Position::Last),
    )
}

/// The text block inside `content`, if it is one.
pub fn text_content(content: &MessageContent) -> Option<&MessageText> {
    match content {
        MessageContent::Text { text } => Some(text),
        _ => None,
    }
}
