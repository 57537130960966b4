//! Shared test helpers and scripted agent.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use serde_json::{json, Value};

use agent_relay::agent::{LogAgent, RunObserver};
use agent_relay::error::RelayError;
use agent_relay::types::{DialogueTurn, NormalizedToolEvent, RawLogEvent};

/// Path used for streamed output operations.
pub const STREAM_PATH: &str = "/streamed_output/-";

/// An agent that plays back a fixed script and records what it was given.
#[derive(Clone, Default)]
pub struct ScriptedAgent {
    events: Vec<Result<RawLogEvent, String>>,
    result: Value,
    seen: Arc<Mutex<Vec<Vec<DialogueTurn>>>>,
}

impl ScriptedAgent {
    pub fn new(events: Vec<RawLogEvent>) -> Self {
        Self {
            events: events.into_iter().map(Ok).collect(),
            ..Default::default()
        }
    }

    /// Append a log failure after the scripted events.
    pub fn failing_after(mut self, message: &str) -> Self {
        self.events.push(Err(message.to_string()));
        self
    }

    pub fn with_result(mut self, result: Value) -> Self {
        self.result = result;
        self
    }

    /// Message lists handed to `stream_log`/`invoke`, in call order.
    pub fn seen(&self) -> Vec<Vec<DialogueTurn>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl LogAgent for ScriptedAgent {
    fn stream_log(&self, messages: Vec<DialogueTurn>) -> BoxStream<'static, Result<RawLogEvent, RelayError>> {
        self.seen.lock().unwrap().push(messages);
        let events: Vec<_> = self
            .events
            .clone()
            .into_iter()
            .map(|event| event.map_err(RelayError::Agent))
            .collect();
        stream::iter(events).boxed()
    }

    async fn invoke(&self, messages: Vec<DialogueTurn>) -> Result<Value, RelayError> {
        self.seen.lock().unwrap().push(messages);
        Ok(self.result.clone())
    }
}

/// Observer that records everything it receives.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub fragments: Vec<String>,
    pub tool_events: Vec<NormalizedToolEvent>,
    /// Fail `on_content` after this many fragments.
    pub fail_after: Option<usize>,
}

#[async_trait]
impl RunObserver for RecordingObserver {
    async fn on_content(&mut self, fragment: &str) -> Result<(), RelayError> {
        if self.fail_after == Some(self.fragments.len()) {
            return Err(RelayError::Stream("client went away".to_string()));
        }
        self.fragments.push(fragment.to_string());
        Ok(())
    }

    async fn on_tool_event(&mut self, event: &NormalizedToolEvent) -> Result<(), RelayError> {
        self.tool_events.push(event.clone());
        Ok(())
    }
}

/// A streamed text event.
pub fn text_event(text: &str) -> RawLogEvent {
    RawLogEvent::add(STREAM_PATH, json!({ "content": text }))
}

/// A streamed tool-call chunk event.
pub fn chunk_event(id: Option<&str>, name: Option<&str>, args: &str, index: u64) -> RawLogEvent {
    RawLogEvent::add(
        STREAM_PATH,
        json!({
            "content": "",
            "tool_call_chunks": [{ "id": id, "name": name, "args": args, "index": index }]
        }),
    )
}
