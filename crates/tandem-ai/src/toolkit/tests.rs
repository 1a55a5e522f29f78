use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use super::*;

fn echo(name: &str) -> Tool {
    Tool::new(ToolConfig::new(name, "Echo the arguments"), |args: Value| async move {
        Ok(Some(args.to_string()))
    })
}

fn constant(name: &str, output: &'static str) -> Tool {
    Tool::new(ToolConfig::new(name, "Constant output"), move |_| async move {
        Ok(Some(output.to_string()))
    })
}

#[test]
fn register_and_get() {
    let toolkit = Toolkit::new();
    toolkit.register(echo("echo"));

    assert_eq!(toolkit.len(), 1);
    assert!(toolkit.get("echo").is_some());
    assert!(toolkit.get("missing").is_none());
}

#[tokio::test]
async fn register_overwrites_silently() {
    let toolkit = Toolkit::new();
    toolkit.register(constant("weather", "cold"));
    toolkit.register(constant("weather", "72F"));

    assert_eq!(toolkit.len(), 1);
    let out = toolkit.get("weather").unwrap().call("{}").await.unwrap();
    assert_eq!(out.as_deref(), Some("72F"));
}

#[test]
fn register_tool_passes_name_to_factory() {
    let toolkit = Toolkit::new();
    let prefix = "Look up".to_string();
    toolkit.register_tool("lookup", |name| {
        Tool::new(
            ToolConfig::new(name, format!("{prefix} things")),
            |_| async { Ok(None) },
        )
    });

    let tool = toolkit.get("lookup").unwrap();
    assert_eq!(tool.name(), "lookup");
    assert_eq!(tool.config().description, "Look up things");
}

#[test]
fn register_tool_keeps_key_and_name_in_sync() {
    let toolkit = Toolkit::new();
    toolkit.register_tool("wanted", |_| echo("something_else"));

    assert!(toolkit.get("something_else").is_none());
    assert_eq!(toolkit.get("wanted").unwrap().name(), "wanted");
}

#[tokio::test]
async fn merge_prefers_incoming_entries() {
    let base = Toolkit::new()
        .with_tool(constant("shared", "base"))
        .with_tool(constant("base_only", "base"));
    let other = Toolkit::new()
        .with_tool(constant("shared", "other"))
        .with_tool(constant("other_only", "other"));

    base.merge(&other);

    assert_eq!(base.names(), vec!["base_only", "other_only", "shared"]);
    let shared = base.get("shared").unwrap().call("").await.unwrap();
    assert_eq!(shared.as_deref(), Some("other"));
    // The source registry is left alone.
    assert_eq!(other.len(), 2);
}

#[test]
fn list_is_a_snapshot() {
    let toolkit = Toolkit::new().with_tool(echo("echo"));
    let mut listed = toolkit.list();
    listed.insert("injected".to_string(), echo("injected"));
    listed.remove("echo");

    assert!(toolkit.get("echo").is_some());
    assert!(toolkit.get("injected").is_none());
}

#[test]
fn shared_toolkit_accepts_late_registration() {
    let toolkit = Arc::new(Toolkit::new());
    let shared = Arc::clone(&toolkit);
    shared.register(echo("late"));
    assert!(toolkit.get("late").is_some());
}

#[test]
fn function_tools_are_sorted_descriptors() {
    let toolkit = Toolkit::new()
        .with_tool(echo("zeta"))
        .with_tool(Tool::new(
            ToolConfig::new("alpha", "First").with_parameters(json!({
                "type": "object",
                "properties": { "q": { "type": "string" } },
                "required": ["q"]
            })),
            |_| async { Ok(None) },
        ));

    let tools = toolkit.function_tools();
    assert_eq!(tools.len(), 2);
    assert_eq!(tools[0]["type"], "function");
    assert_eq!(tools[0]["function"]["name"], "alpha");
    assert_eq!(tools[0]["function"]["parameters"]["required"][0], "q");
    assert_eq!(tools[1]["function"]["name"], "zeta");
}

#[tokio::test]
async fn call_parses_raw_arguments() {
    let out = echo("echo").call(r#"{"city":"Oslo"}"#).await.unwrap();
    assert_eq!(out.as_deref(), Some(r#"{"city":"Oslo"}"#));
}

#[tokio::test]
async fn empty_payload_means_no_arguments() {
    let out = echo("echo").call("  ").await.unwrap();
    assert_eq!(out.as_deref(), Some("{}"));
}

#[tokio::test]
async fn malformed_json_is_invalid_arguments() {
    let err = echo("echo").call("{not json").await.unwrap_err();
    assert!(matches!(err, ToolError::InvalidArguments { ref tool, .. } if tool == "echo"));
}

#[tokio::test]
async fn validator_can_coerce_arguments() {
    let tool = echo("echo").with_validator(|mut args| {
        if let Some(n) = args.get("n").and_then(Value::as_str).map(str::to_string) {
            let parsed: i64 = n
                .parse()
                .map_err(|_| ToolError::failed(format!("n is not a number: {n}")))?;
            args["n"] = json!(parsed);
        }
        Ok(args)
    });

    let out = tool.call(r#"{"n":"42"}"#).await.unwrap();
    assert_eq!(out.as_deref(), Some(r#"{"n":42}"#));

    let err = tool.call(r#"{"n":"many"}"#).await.unwrap_err();
    assert_eq!(err.to_string(), "n is not a number: many");
}

#[derive(Deserialize)]
struct LookupArgs {
    key: String,
}

#[tokio::test]
async fn typed_tools_reject_mismatched_arguments() {
    let tool = Tool::typed(
        ToolConfig::new("lookup", "Look up a key"),
        |args: LookupArgs| async move { Ok(Some(format!("value of {}", args.key))) },
    );

    let ok = tool.call(r#"{"key":"a"}"#).await.unwrap();
    assert_eq!(ok.as_deref(), Some("value of a"));

    let err = tool.call(r#"{"other":1}"#).await.unwrap_err();
    assert!(matches!(err, ToolError::InvalidArguments { .. }));
    assert!(err.to_string().contains("key"));
}

#[tokio::test]
async fn panicking_tool_is_reported_not_propagated() {
    let tool = Tool::new(ToolConfig::new("boom", "Always panics"), |args: Value| async move {
        if args.is_object() {
            panic!("kaboom");
        }
        Ok(None)
    });

    let err = tool.call("{}").await.unwrap_err();
    assert_eq!(
        err,
        ToolError::Panicked {
            tool: "boom".into(),
            message: "kaboom".into()
        }
    );
}

#[test]
fn tool_config_renders_function_tool() {
    let config = ToolConfig::new("get_weather", "Current weather").with_parameters(json!({
        "type": "object",
        "properties": { "city": { "type": "string" } }
    }));
    let rendered = config.to_function_tool();
    assert_eq!(
        rendered,
        json!({
            "type": "function",
            "function": {
                "name": "get_weather",
                "description": "Current weather",
                "parameters": {
                    "type": "object",
                    "properties": { "city": { "type": "string" } }
                }
            }
        })
    );
}
