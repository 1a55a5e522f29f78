//! Tool descriptors and invocation.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::FutureExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Function descriptor advertised to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolConfig {
    pub name: String,
    pub description: String,
    /// JSON schema of the argument object.
    pub parameters: Value,
}

impl ToolConfig {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: serde_json::json!({ "type": "object", "properties": {} }),
        }
    }

    pub fn with_parameters(mut self, parameters: Value) -> Self {
        self.parameters = parameters;
        self
    }

    /// Render as an Assistants API function tool.
    pub fn to_function_tool(&self) -> Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolError {
    #[error("invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    #[error("{0}")]
    ExecutionFailed(String),

    #[error("tool {tool} panicked: {message}")]
    Panicked { tool: String, message: String },
}

impl ToolError {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::ExecutionFailed(reason.into())
    }
}

/// The invocation half of a tool.
///
/// `Ok(None)` and `Ok(Some(""))` both mean the tool produced nothing.
#[async_trait]
pub trait ToolMethod: Send + Sync {
    async fn invoke(&self, args: Value) -> Result<Option<String>, ToolError>;
}

/// Validates and optionally coerces raw arguments before invocation.
pub type ArgValidator = Arc<dyn Fn(Value) -> Result<Value, ToolError> + Send + Sync>;

struct FnMethod<F>(F);

#[async_trait]
impl<F, Fut> ToolMethod for FnMethod<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<String>, ToolError>> + Send,
{
    async fn invoke(&self, args: Value) -> Result<Option<String>, ToolError> {
        (self.0)(args).await
    }
}

struct TypedMethod<A, F> {
    tool: String,
    f: F,
    _args: PhantomData<fn() -> A>,
}

#[async_trait]
impl<A, F, Fut> ToolMethod for TypedMethod<A, F>
where
    A: DeserializeOwned + Send,
    F: Fn(A) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<String>, ToolError>> + Send,
{
    async fn invoke(&self, args: Value) -> Result<Option<String>, ToolError> {
        let args: A = serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments {
            tool: self.tool.clone(),
            reason: e.to_string(),
        })?;
        (self.f)(args).await
    }
}

/// A registered tool. Cloning is cheap; the invoker is shared.
#[derive(Clone)]
pub struct Tool {
    config: ToolConfig,
    method: Arc<dyn ToolMethod>,
    validator: Option<ArgValidator>,
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("config", &self.config)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

impl Tool {
    /// A tool taking the raw JSON argument object.
    pub fn new<F, Fut>(config: ToolConfig, f: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<String>, ToolError>> + Send + 'static,
    {
        Self::from_method(config, Arc::new(FnMethod(f)))
    }

    /// A tool whose arguments are deserialized into `A` before the call.
    /// Arguments that do not fit `A` fail with [`ToolError::InvalidArguments`].
    pub fn typed<A, F, Fut>(config: ToolConfig, f: F) -> Self
    where
        A: DeserializeOwned + Send + 'static,
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<String>, ToolError>> + Send + 'static,
    {
        let method = TypedMethod {
            tool: config.name.clone(),
            f,
            _args: PhantomData,
        };
        Self::from_method(config, Arc::new(method))
    }

    pub fn from_method(config: ToolConfig, method: Arc<dyn ToolMethod>) -> Self {
        Self {
            config,
            method,
            validator: None,
        }
    }

    pub fn with_validator<V>(mut self, validator: V) -> Self
    where
        V: Fn(Value) -> Result<Value, ToolError> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    pub(crate) fn renamed(mut self, name: &str) -> Self {
        self.config.name = name.to_string();
        self
    }

    /// Parse `raw_arguments`, validate them, and invoke the tool.
    ///
    /// Panics inside the validator or the invoker are caught and reported
    /// as [`ToolError::Panicked`].
    pub async fn call(&self, raw_arguments: &str) -> Result<Option<String>, ToolError> {
        let args = self.parse_arguments(raw_arguments)?;

        let args = match &self.validator {
            Some(validate) => std::panic::catch_unwind(AssertUnwindSafe(|| validate(args)))
                .map_err(|payload| self.panicked(payload))??,
            None => args,
        };

        AssertUnwindSafe(self.method.invoke(args))
            .catch_unwind()
            .await
            .map_err(|payload| self.panicked(payload))?
    }

    fn parse_arguments(&self, raw: &str) -> Result<Value, ToolError> {
        // Argument-less functions sometimes arrive with an empty payload.
        if raw.trim().is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }
        serde_json::from_str(raw).map_err(|e| ToolError::InvalidArguments {
            tool: self.config.name.clone(),
            reason: e.to_string(),
        })
    }

    fn panicked(&self, payload: Box<dyn Any + Send>) -> ToolError {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        ToolError::Panicked {
            tool: self.config.name.clone(),
            message,
        }
    }
}
