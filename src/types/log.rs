//! Raw execution-log events and the adapter that types their values.
//!
//! The agent emits JSON-patch-like run-log events. Each `add` operation may
//! carry a message value in one of several adapter-specific shapes. The
//! [`LogValue::from_json`] adapter reduces that value to optional plain text
//! plus a closed set of [`ToolSignal`] variants, so downstream code never
//! probes raw JSON for optional fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

use crate::util::json::spaced;

/// One step of the agent's execution trace.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawLogEvent {
    #[serde(default)]
    pub ops: Vec<LogOperation>,
}

impl RawLogEvent {
    /// Event with a single `add` operation.
    pub fn add(path: impl Into<String>, value: Value) -> Self {
        Self {
            ops: vec![LogOperation {
                op: OpKind::Add,
                path: path.into(),
                value: Some(value),
            }],
        }
    }

    /// Values of every `add` operation that carries one, in order.
    pub fn added_values(&self) -> impl Iterator<Item = &Value> {
        self.ops
            .iter()
            .filter(|op| op.op == OpKind::Add)
            .filter_map(|op| op.value.as_ref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogOperation {
    pub op: OpKind,
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Operation kind of a log entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OpKind {
    Add,
    Replace,
    Remove,
    Move,
    Copy,
    Test,
    #[serde(other)]
    Unknown,
}

/// Typed view of one operation value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogValue {
    /// Plain generated text, if any.
    pub content: Option<String>,
    pub signals: Vec<ToolSignal>,
}

/// The three shapes a tool-call signal can take.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolSignal {
    /// `additional_kwargs.tool_calls` (or legacy `function_call`).
    Descriptor(Vec<DescriptorCall>),
    /// Top-level `tool_calls` list with already-parsed arguments.
    ToolCalls(Vec<ToolCallEntry>),
    /// `tool_call_chunks` carrying argument fragments.
    Chunks(Vec<ToolCallChunk>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescriptorCall {
    pub id: Option<String>,
    pub name: Option<String>,
    pub arguments: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ToolCallEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ToolCallChunk {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub args: Option<String>,
    #[serde(default)]
    pub index: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawDescriptor {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    function: Option<RawFunction>,
}

#[derive(Debug, Default, Deserialize)]
struct RawFunction {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    arguments: Option<Value>,
}

impl From<RawFunction> for DescriptorCall {
    fn from(function: RawFunction) -> Self {
        Self {
            id: None,
            name: function.name,
            arguments: function.arguments.map(|args| match args {
                Value::String(text) => text,
                other => spaced(&other),
            }),
        }
    }
}

impl LogValue {
    /// Adapt a raw operation value.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::String(text) => Self {
                content: Some(text.clone()),
                signals: Vec::new(),
            },
            Value::Object(map) => Self::from_map(map),
            _ => Self::default(),
        }
    }

    fn from_map(map: &Map<String, Value>) -> Self {
        let mut signals = Vec::new();

        if let Some(kwargs) = map.get("additional_kwargs") {
            let calls = descriptor_calls(kwargs);
            if !calls.is_empty() {
                signals.push(ToolSignal::Descriptor(calls));
            }
        }

        let entries: Vec<ToolCallEntry> = parse_list(map.get("tool_calls"));
        if !entries.is_empty() {
            signals.push(ToolSignal::ToolCalls(entries));
        }

        let chunks: Vec<ToolCallChunk> = parse_list(map.get("tool_call_chunks"));
        if !chunks.is_empty() {
            signals.push(ToolSignal::Chunks(chunks));
        }

        Self {
            content: map.get("content").and_then(content_text),
            signals,
        }
    }

    pub fn descriptor_calls(&self) -> &[DescriptorCall] {
        self.signals
            .iter()
            .find_map(|s| match s {
                ToolSignal::Descriptor(calls) => Some(calls.as_slice()),
                _ => None,
            })
            .unwrap_or_default()
    }

    pub fn tool_calls(&self) -> &[ToolCallEntry] {
        self.signals
            .iter()
            .find_map(|s| match s {
                ToolSignal::ToolCalls(entries) => Some(entries.as_slice()),
                _ => None,
            })
            .unwrap_or_default()
    }

    pub fn tool_call_chunks(&self) -> &[ToolCallChunk] {
        self.signals
            .iter()
            .find_map(|s| match s {
                ToolSignal::Chunks(chunks) => Some(chunks.as_slice()),
                _ => None,
            })
            .unwrap_or_default()
    }
}

fn descriptor_calls(kwargs: &Value) -> Vec<DescriptorCall> {
    let mut calls: Vec<DescriptorCall> = parse_list::<RawDescriptor>(kwargs.get("tool_calls"))
        .into_iter()
        .map(|raw| {
            let mut call: DescriptorCall = raw.function.unwrap_or_default().into();
            call.id = raw.id;
            call
        })
        .collect();

    if calls.is_empty() {
        if let Some(function) = kwargs
            .get("function_call")
            .and_then(|f| serde_json::from_value::<RawFunction>(f.clone()).ok())
        {
            calls.push(function.into());
        }
    }
    calls
}

/// Typed entries of a list, in order, up to the first malformed one.
///
/// Stopping there keeps positions stable: a later entry never stands in for
/// a broken first one.
fn parse_list<T: serde::de::DeserializeOwned>(value: Option<&Value>) -> Vec<T> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    let mut parsed = Vec::with_capacity(items.len());
    for (position, item) in items.iter().enumerate() {
        match serde_json::from_value(item.clone()) {
            Ok(entry) => parsed.push(entry),
            Err(error) => {
                tracing::trace!(position, error = %error, "dropping malformed tool-call entry and the rest of its list");
                break;
            }
        }
    }
    parsed
}

/// Text of a `content` field: a string, or the text parts of a part list.
fn content_text(content: &Value) -> Option<String> {
    let text = match content {
        Value::String(text) => Some(text.clone()),
        Value::Array(parts) => {
            let text: String = parts
                .iter()
                .filter_map(|part| match part {
                    Value::String(text) => Some(text.as_str()),
                    Value::Object(obj) => obj
                        .get("text")
                        .filter(|_| obj.get("type").and_then(Value::as_str).unwrap_or("text") == "text")
                        .and_then(Value::as_str),
                    _ => None,
                })
                .collect();
            Some(text)
        }
        _ => None,
    };
    text.filter(|text| !text.is_empty())
}
