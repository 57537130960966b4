//! Normalization of caller-supplied role/content records into dialogue turns.

use serde_json::Value;

use crate::types::{DialogueTurn, MessageRecord, Role};
use crate::util::json::to_spaced_string;

/// Convert records into an ordered list of [`DialogueTurn`]s.
///
/// A non-empty `system_prompt` becomes the first turn, even when the records
/// already contain a system message. Non-text content is rendered as JSON.
/// Turns whose content ends up empty are skipped; order is preserved.
pub fn normalize_messages(records: &[MessageRecord], system_prompt: Option<&str>) -> Vec<DialogueTurn> {
    let mut turns = Vec::with_capacity(records.len() + 1);

    if let Some(prompt) = system_prompt.filter(|p| !p.is_empty()) {
        turns.push(DialogueTurn::system(prompt));
    }

    for record in records {
        let content = content_to_text(&record.content);
        if content.is_empty() {
            continue;
        }
        turns.push(DialogueTurn::new(Role::from_record(&record.role), content));
    }

    tracing::trace!(records = records.len(), turns = turns.len(), "normalized dialogue");
    turns
}

/// Textual form of a record's content. Never fails.
pub fn content_to_text(content: &Value) -> String {
    match content {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => to_spaced_string(other).unwrap_or_else(|err| {
            tracing::debug!(error = %err, "content serialization failed; using debug form");
            format!("{other:?}")
        }),
    }
}
