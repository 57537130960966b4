//! Per-run accumulation of streamed tool-call argument fragments.

use std::collections::HashMap;

use serde_json::Value;

use crate::util::json::parse_structured;

/// Key used for fragments that arrive without any call identifier.
pub const DEFAULT_CALL_ID: &str = "__default__";

const INDEX_KEY_PREFIX: &str = "index:";

/// Accumulates argument fragments per call id.
///
/// Entries only ever grow; the buffer is dropped with the run that owns it.
#[derive(Debug, Default)]
pub struct ArgumentBuffer {
    entries: HashMap<String, String>,
    names: HashMap<String, String>,
    index_aliases: HashMap<u64, String>,
}

impl ArgumentBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `fragment` to the text stored under `call_id` and try to parse it.
    ///
    /// Returns the parsed value and `true` once the accumulated text is a
    /// complete JSON object or array, otherwise `(None, false)`.
    pub fn append(&mut self, call_id: Option<&str>, fragment: &str) -> (Option<Value>, bool) {
        let key = key_for(call_id);
        let entry = self.entries.entry(key.to_string()).or_default();
        entry.push_str(fragment);

        match parse_structured(entry.as_str()) {
            Some(value) => (Some(value), true),
            None => (None, false),
        }
    }

    /// Text accumulated so far for `call_id`.
    pub fn accumulated(&self, call_id: Option<&str>) -> Option<&str> {
        self.entries.get(key_for(call_id)).map(String::as_str)
    }

    /// Resolve the buffer key for a chunk.
    ///
    /// Chunks after the first often carry only an `index`; once a chunk has
    /// shown both an id and an index, later id-less chunks with that index
    /// resolve to the same id.
    pub fn resolve_call_id(&mut self, id: Option<&str>, index: Option<u64>) -> String {
        match (id.filter(|id| !id.is_empty()), index) {
            (Some(id), Some(index)) => {
                self.index_aliases.insert(index, id.to_string());
                id.to_string()
            }
            (Some(id), None) => id.to_string(),
            (None, Some(index)) => self
                .index_aliases
                .get(&index)
                .cloned()
                .unwrap_or_else(|| format!("{INDEX_KEY_PREFIX}{index}")),
            (None, None) => DEFAULT_CALL_ID.to_string(),
        }
    }

    /// Record the tool name for a call id; the first name seen wins.
    pub fn remember_name(&mut self, call_id: &str, name: &str) {
        self.names
            .entry(call_id.to_string())
            .or_insert_with(|| name.to_string());
    }

    pub fn name_for(&self, call_id: &str) -> Option<&str> {
        self.names.get(call_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Whether `key` was synthesized rather than supplied by the model.
pub fn is_synthetic_call_id(key: &str) -> bool {
    key == DEFAULT_CALL_ID || key.starts_with(INDEX_KEY_PREFIX)
}

fn key_for(call_id: Option<&str>) -> &str {
    call_id.filter(|id| !id.is_empty()).unwrap_or(DEFAULT_CALL_ID)
}
