//! Tool-signal extraction from one execution-log value.

use serde_json::Value;

use super::buffer::{is_synthetic_call_id, ArgumentBuffer};
use crate::types::{LogValue, NormalizedToolEvent};
use crate::util::json::{parse_structured, spaced};

/// Recover a [`NormalizedToolEvent`] from `value`, or `None` if it carries no
/// tool signal.
///
/// Fields are taken first-present-wins in this order: the nested descriptor,
/// the top-level tool-call list, then the streamed chunk list. A chunk
/// fragment is appended to `buffer`; when that completes the arguments, the
/// reconstructed text replaces any earlier preview. A still-partial chunk
/// never displaces a preview from the first two shapes.
pub fn extract_tool_event(value: &LogValue, buffer: &mut ArgumentBuffer) -> Option<NormalizedToolEvent> {
    let mut name = None;
    let mut args_preview = None;
    let mut call_id = None;
    let mut chunk_complete = false;

    if let Some(call) = value.descriptor_calls().first() {
        name = non_empty(call.name.as_deref());
        args_preview = non_empty(call.arguments.as_deref());
        call_id = non_empty(call.id.as_deref());
    }

    if let Some(entry) = value.tool_calls().first() {
        name = name.or_else(|| non_empty(entry.name.as_deref()));
        args_preview = args_preview.or_else(|| args_text(&entry.args));
        call_id = call_id.or_else(|| non_empty(entry.id.as_deref()));
    }

    if let Some(chunk) = value.tool_call_chunks().first() {
        let key = buffer.resolve_call_id(chunk.id.as_deref(), chunk.index);
        let chunk_name = non_empty(chunk.name.as_deref());
        if let Some(chunk_name) = &chunk_name {
            buffer.remember_name(&key, chunk_name);
        }

        let fragment = chunk.args.as_deref().unwrap_or_default();
        if !fragment.is_empty() {
            let (parsed, complete) = buffer.append(Some(&key), fragment);
            chunk_complete = complete;
            match parsed {
                Some(parsed) if complete => args_preview = Some(spaced(&parsed)),
                _ => {
                    if args_preview.is_none() {
                        args_preview = buffer.accumulated(Some(&key)).map(str::to_owned);
                    }
                }
            }
        }

        // A chunk's own name beats the one remembered for a reused key.
        name = name
            .or(chunk_name)
            .or_else(|| buffer.name_for(&key).map(str::to_owned));
        if !is_synthetic_call_id(&key) {
            call_id = call_id.or(Some(key));
        }
    }

    if name.is_none() && args_preview.is_none() {
        return None;
    }

    let complete = match args_preview.as_deref() {
        Some(text) if parse_structured(text).is_some() => true,
        _ => chunk_complete,
    };

    tracing::trace!(?name, ?call_id, complete, "tool signal extracted");

    Some(NormalizedToolEvent {
        name,
        args_preview,
        complete,
        call_id,
    })
}

fn non_empty(text: Option<&str>) -> Option<String> {
    text.filter(|t| !t.is_empty()).map(str::to_owned)
}

/// Text for already-parsed arguments; empty/default values yield `None`.
fn args_text(args: &Value) -> Option<String> {
    match args {
        Value::Null => None,
        Value::String(text) => non_empty(Some(text.as_str())),
        Value::Object(map) if map.is_empty() => None,
        Value::Array(items) if items.is_empty() => None,
        other => Some(spaced(other)),
    }
}
