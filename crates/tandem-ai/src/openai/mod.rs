//! OpenAI Assistants API (v2) backend.
//!
//! Implements the remote service traits over HTTP: assistants, threads,
//! messages and runs, polling runs until they leave their transient states.

mod api;
mod client;
mod config;

pub use client::OpenAiClient;
pub use config::OpenAiConfig;
