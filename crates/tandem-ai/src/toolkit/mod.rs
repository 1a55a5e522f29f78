//! Tool registry.
//!
//! Tools are local capabilities the model may call while a run is active.
//! Each one pairs a function descriptor with an async invoker and an
//! optional argument validator.

mod registry;
mod tool;

#[cfg(test)]
mod tests;

pub use registry::Toolkit;
pub use tool::{ArgValidator, Tool, ToolConfig, ToolError, ToolMethod};
