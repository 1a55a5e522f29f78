//! Shared error types and identifiers for the tandem workspace.

pub mod errors;
pub mod id;

pub use errors::{ConfigError, TandemError};
pub use id::new_correlation_id;

pub type Result<T> = std::result::Result<T, TandemError>;
