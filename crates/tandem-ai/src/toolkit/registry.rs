//! Name-keyed tool registry shared across turns.

use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;
use tracing::{debug, warn};

use super::tool::Tool;

/// Mapping from tool name to [`Tool`].
///
/// Every key equals its tool's declared name. Registration takes `&self`,
/// so a toolkit behind an `Arc` can still grow while sessions use it.
#[derive(Default)]
pub struct Toolkit {
    tools: RwLock<HashMap<String, Tool>>,
}

impl Toolkit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `tool` under its own name, replacing any previous entry.
    pub fn register(&self, tool: Tool) {
        let name = tool.name().to_string();
        debug!(tool = %name, "Registering tool");
        self.write().insert(name, tool);
    }

    /// Build a tool with `factory` and register it under `name`.
    ///
    /// The factory receives the name; extra arguments are whatever it
    /// captures. A tool that comes back under a different name is renamed.
    pub fn register_tool<F>(&self, name: &str, factory: F)
    where
        F: FnOnce(&str) -> Tool,
    {
        let mut tool = factory(name);
        if tool.name() != name {
            warn!(expected = name, got = tool.name(), "Tool factory returned a different name");
            tool = tool.renamed(name);
        }
        self.register(tool);
    }

    pub fn with_tool(self, tool: Tool) -> Self {
        self.register(tool);
        self
    }

    /// Overlay `other` onto this toolkit; incoming entries win.
    pub fn merge(&self, other: &Toolkit) {
        let incoming = other.list();
        self.write().extend(incoming);
    }

    pub fn get(&self, name: &str) -> Option<Tool> {
        self.read().get(name).cloned()
    }

    /// Snapshot of all entries. Changing the map does not touch the toolkit.
    pub fn list(&self) -> HashMap<String, Tool> {
        self.read().clone()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Function-tool descriptors for every entry, sorted by name.
    pub fn function_tools(&self) -> Vec<Value> {
        let tools = self.read();
        let mut entries: Vec<&Tool> = tools.values().collect();
        entries.sort_by(|a, b| a.name().cmp(b.name()));
        entries
            .into_iter()
            .map(|tool| tool.config().to_function_tool())
            .collect()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Tool>> {
        self.tools.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Tool>> {
        self.tools.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Toolkit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toolkit").field("tools", &self.names()).finish()
    }
}
