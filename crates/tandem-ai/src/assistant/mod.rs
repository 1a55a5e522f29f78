//! Assistant sessions.
//!
//! An [`Assistant`] pairs one remote assistant definition with one thread,
//! allows a single turn in flight at a time, and drives each turn through
//! tool-call rounds until the run settles.

mod as_tool;
pub(crate) mod driver;
mod error;
mod session;
mod types;


pub use as_tool::AssistantTool;
pub use error::{AssistantError, RunError};
pub use session::{Assistant, AssistantOptions, DEFAULT_MAX_TOOL_ROUNDS};
pub use types::{ProgressEvent, ProgressHandler, ProgressKind};
