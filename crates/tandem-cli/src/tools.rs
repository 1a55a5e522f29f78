//! Built-in tools available to every session.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;
use tandem_ai::{Tool, ToolConfig, ToolError, Toolkit};

#[derive(Deserialize)]
struct CurrentTimeArgs {
    #[serde(default)]
    utc_offset_hours: Option<f64>,
}

#[derive(Deserialize)]
struct WordCountArgs {
    text: String,
}

pub fn builtin_toolkit() -> Toolkit {
    Toolkit::new()
        .with_tool(current_time())
        .with_tool(word_count())
}

fn current_time() -> Tool {
    let config = ToolConfig::new(
        "current_time",
        "Current date and time in RFC 3339 format.",
    )
    .with_parameters(serde_json::json!({
        "type": "object",
        "properties": {
            "utc_offset_hours": {
                "type": "number",
                "description": "Offset from UTC in hours, e.g. -5 or 5.5. Defaults to UTC."
            }
        }
    }));

    Tool::typed(config, |args: CurrentTimeArgs| async move {
        format_time(Utc::now(), args.utc_offset_hours).map(Some)
    })
}

fn format_time(now: DateTime<Utc>, offset_hours: Option<f64>) -> Result<String, ToolError> {
    let Some(hours) = offset_hours else {
        return Ok(now.to_rfc3339());
    };
    let offset = FixedOffset::east_opt((hours * 3600.0).round() as i32)
        .ok_or_else(|| ToolError::failed(format!("utc_offset_hours {hours} is out of range")))?;
    Ok(now.with_timezone(&offset).to_rfc3339())
}

fn word_count() -> Tool {
    let config = ToolConfig::new("word_count", "Count the words and characters in a text.")
        .with_parameters(serde_json::json!({
            "type": "object",
            "properties": {
                "text": { "type": "string", "description": "The text to count." }
            },
            "required": ["text"]
        }));

    Tool::typed(config, |args: WordCountArgs| async move {
        let counts = serde_json::json!({
            "words": args.text.split_whitespace().count(),
            "characters": args.text.chars().count(),
        });
        Ok(Some(counts.to_string()))
    })
}
