//! Agent that replays a recorded execution log.

use std::path::Path;

use async_trait::async_trait;
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use serde_json::Value;

use super::contract::LogAgent;
use crate::error::RelayError;
use crate::types::{DialogueTurn, LogValue, RawLogEvent};

/// Replays recorded [`RawLogEvent`]s regardless of the input messages.
#[derive(Debug, Clone, Default)]
pub struct ReplayAgent {
    events: Vec<RawLogEvent>,
    result: Option<Value>,
}

impl ReplayAgent {
    pub fn new(events: Vec<RawLogEvent>) -> Self {
        Self { events, result: None }
    }

    /// Value returned by [`LogAgent::invoke`]. Without one, `invoke` returns
    /// the concatenated text of the recorded log.
    pub fn with_result(mut self, result: Value) -> Self {
        self.result = Some(result);
        self
    }

    /// Parse one JSON event per line; blank lines are skipped.
    pub fn from_json_lines(text: &str) -> Result<Self, RelayError> {
        let mut events = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let event = serde_json::from_str(line).map_err(|e| {
                RelayError::InvalidArgument(format!("log line {}: {e}", line_no + 1))
            })?;
            events.push(event);
        }
        Ok(Self::new(events))
    }

    pub async fn load(path: &Path) -> Result<Self, RelayError> {
        let text = tokio::fs::read_to_string(path).await?;
        Self::from_json_lines(&text)
    }

    pub fn events(&self) -> &[RawLogEvent] {
        &self.events
    }

    fn recorded_text(&self) -> String {
        self.events
            .iter()
            .flat_map(|event| event.added_values())
            .filter_map(|raw| LogValue::from_json(raw).content)
            .collect()
    }
}

#[async_trait]
impl LogAgent for ReplayAgent {
    fn stream_log(&self, _messages: Vec<DialogueTurn>) -> BoxStream<'static, Result<RawLogEvent, RelayError>> {
        stream::iter(self.events.clone().into_iter().map(Ok)).boxed()
    }

    async fn invoke(&self, _messages: Vec<DialogueTurn>) -> Result<Value, RelayError> {
        Ok(self
            .result
            .clone()
            .unwrap_or_else(|| Value::String(self.recorded_text())))
    }
}
