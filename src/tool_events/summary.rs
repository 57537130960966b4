//! Human-facing status lines for tool events.

use serde_json::Value;

use crate::types::NormalizedToolEvent;

const MAX_PREVIEW_PAIRS: usize = 3;
const STRING_PREVIEW_LIMIT: usize = 48;
const RAW_PREVIEW_LIMIT: usize = 160;

/// Render the status line for a tool event.
///
/// `tool: <name> | receiving arguments...` while arguments stream in,
/// `tool: <name> | args: <summary>` once they are complete.
pub fn describe_tool_event(event: &NormalizedToolEvent) -> String {
    let name = event
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .unwrap_or("unknown");

    if !event.complete {
        return format!("tool: {name} | receiving arguments...");
    }

    let args = event.args_preview.as_deref().unwrap_or_default();
    format!("tool: {name} | args: {}", summarize_args(args))
}

/// Short preview of argument text.
///
/// Objects show up to three `key=value` pairs, lists show their length, and
/// anything that is not a JSON object or list is truncated raw text.
pub fn summarize_args(raw: &str) -> String {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => {
            if map.is_empty() {
                return "{}".to_string();
            }
            let mut parts: Vec<String> = map
                .iter()
                .take(MAX_PREVIEW_PAIRS)
                .map(|(key, value)| format!("{key}={}", preview_value(value)))
                .collect();
            if map.len() > MAX_PREVIEW_PAIRS {
                parts.push(format!("+{} more", map.len() - MAX_PREVIEW_PAIRS));
            }
            parts.join(", ")
        }
        Ok(Value::Array(items)) => format!("[{} items]", items.len()),
        _ => truncate(raw.trim(), RAW_PREVIEW_LIMIT),
    }
}

fn preview_value(value: &Value) -> String {
    match value {
        Value::String(text) => truncate(text, STRING_PREVIEW_LIMIT),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(_) => "{...}".to_string(),
    }
}

fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
