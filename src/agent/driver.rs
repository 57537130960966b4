//! Streaming execution driver: one agent run from messages to outward output.

use std::sync::Arc;

use bon::Builder;
use futures::StreamExt;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use super::contract::{CreateAgentFn, LoadToolsFn, LogAgent, MakeLlmFn};
use super::observer::{RelayObserver, RunObserver};
use crate::config::RelayConfig;
use crate::dialogue::normalize_messages;
use crate::error::RelayError;
use crate::notify::Sink;
use crate::stream_transform::{slice_text, DeltaEncoder, DEFAULT_CHUNK_WIDTH};
use crate::tool_events::{extract_tool_event, ArgumentBuffer};
use crate::tools::{ResilientTool, Tool};
use crate::types::{DialogueTurn, LogValue, MessageRecord};
use crate::util::json::spaced;
use crate::util::retry::RetryPolicy;

/// Messages for a run, either raw records or already-normalized turns.
#[derive(Debug, Clone, PartialEq)]
pub enum RunMessages {
    Records(Vec<MessageRecord>),
    Turns(Vec<DialogueTurn>),
}

impl From<Vec<MessageRecord>> for RunMessages {
    fn from(records: Vec<MessageRecord>) -> Self {
        Self::Records(records)
    }
}

impl From<Vec<DialogueTurn>> for RunMessages {
    fn from(turns: Vec<DialogueTurn>) -> Self {
        Self::Turns(turns)
    }
}

/// Input of a single run.
#[derive(Builder)]
pub struct RunInput {
    #[builder(into)]
    pub messages: RunMessages,
    #[builder(into)]
    pub system_prompt: Option<String>,
    /// Explicit tools; take precedence over the driver's loader.
    pub tools: Option<Vec<Arc<dyn Tool>>>,
}

impl RunInput {
    pub fn new(messages: impl Into<RunMessages>) -> Self {
        Self {
            messages: messages.into(),
            system_prompt: None,
            tools: None,
        }
    }
}

/// Counters for a finished streaming run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Execution-log events consumed.
    pub events: usize,
    /// Content fragments handed to the observer.
    pub fragments: usize,
    /// Tool events handed to the observer.
    pub tool_events: usize,
}

/// Drives agent runs built from a model factory and an agent constructor.
///
/// Each run owns its own [`ArgumentBuffer`]; nothing is shared between runs.
pub struct ExecutionDriver<M> {
    make_llm: MakeLlmFn<M>,
    create_agent: CreateAgentFn<M>,
    load_tools: Option<LoadToolsFn>,
    retry_policy: RetryPolicy,
    chunk_width: usize,
}

impl<M: Send + 'static> ExecutionDriver<M> {
    pub fn new<L, A>(make_llm: L, create_agent: A) -> Self
    where
        L: Fn() -> Result<M, RelayError> + Send + Sync + 'static,
        A: Fn(M, Vec<Arc<dyn Tool>>) -> Result<Box<dyn LogAgent>, RelayError> + Send + Sync + 'static,
    {
        Self {
            make_llm: Arc::new(make_llm),
            create_agent: Arc::new(create_agent),
            load_tools: None,
            retry_policy: RetryPolicy::default(),
            chunk_width: DEFAULT_CHUNK_WIDTH,
        }
    }

    pub fn with_tool_loader(mut self, loader: LoadToolsFn) -> Self {
        self.load_tools = Some(loader);
        self
    }

    /// Policy every resolved tool is wrapped with.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy.clamped();
        self
    }

    pub fn with_chunk_width(mut self, width: usize) -> Self {
        self.chunk_width = width.max(1);
        self
    }

    /// Take retry policy and chunk width from `config`.
    pub fn with_config(self, config: &RelayConfig) -> Self {
        self.with_retry_policy(config.retry.clone())
            .with_chunk_width(config.chunk_width)
    }

    pub fn chunk_width(&self) -> usize {
        self.chunk_width
    }

    /// Run the agent and stream its log through `observer`.
    ///
    /// For every `add` operation value, a recovered tool signal goes to
    /// `on_tool_event` and any plain text goes to `on_content` in fixed-width
    /// slices. The two paths are independent. Ends when the log ends; the
    /// first error from the log or the observer aborts the run.
    pub async fn stream<O>(&self, input: RunInput, observer: &mut O) -> Result<RunStats, RelayError>
    where
        O: RunObserver + ?Sized,
    {
        let run_id = Uuid::new_v4();
        let (agent, messages) = self.prepare(input).await?;
        tracing::debug!(%run_id, turns = messages.len(), "streaming run started");

        let mut buffer = ArgumentBuffer::new();
        let mut stats = RunStats::default();
        let mut log = agent.stream_log(messages);

        while let Some(event) = log.next().await {
            let event = event?;
            stats.events += 1;

            for raw in event.added_values() {
                let value = LogValue::from_json(raw);

                if let Some(tool_event) = extract_tool_event(&value, &mut buffer) {
                    stats.tool_events += 1;
                    observer.on_tool_event(&tool_event).await?;
                }

                if let Some(text) = value.content.as_deref() {
                    for fragment in slice_text(text, self.chunk_width) {
                        observer.on_content(fragment).await?;
                        stats.fragments += 1;
                    }
                }
            }
        }

        tracing::debug!(
            %run_id,
            events = stats.events,
            fragments = stats.fragments,
            tool_events = stats.tool_events,
            pending_calls = buffer.len(),
            "streaming run finished"
        );
        Ok(stats)
    }

    /// Stream a run as chat-completion chunks on `encoder`, reporting tool
    /// events to `status_sink`.
    ///
    /// The terminal marker is sent only when the run succeeds.
    pub async fn relay(
        &self,
        input: RunInput,
        encoder: &DeltaEncoder,
        status_sink: Option<Sink>,
    ) -> Result<RunStats, RelayError> {
        let mut observer = RelayObserver::new(encoder.clone(), status_sink);
        let stats = self.stream(input, &mut observer).await?;
        encoder.send_done().await?;
        Ok(stats)
    }

    /// Run the agent to a single result and return its text.
    pub async fn complete(&self, input: RunInput) -> Result<String, RelayError> {
        let (agent, messages) = self.prepare(input).await?;
        let value = agent.invoke(messages).await?;
        Ok(final_text(&value))
    }

    async fn prepare(&self, input: RunInput) -> Result<(Box<dyn LogAgent>, Vec<DialogueTurn>), RelayError> {
        let model = (self.make_llm)()?;

        let tools = match (input.tools, &self.load_tools) {
            (Some(tools), _) => tools,
            (None, Some(loader)) => loader().await?,
            (None, None) => Vec::new(),
        };
        let tools = ResilientTool::wrap_all(tools, &self.retry_policy);

        let system_prompt = input.system_prompt.as_deref();
        let messages = match input.messages {
            RunMessages::Records(records) => normalize_messages(&records, system_prompt),
            RunMessages::Turns(turns) => {
                let mut messages = Vec::with_capacity(turns.len() + 1);
                if let Some(prompt) = system_prompt.filter(|p| !p.is_empty()) {
                    messages.push(DialogueTurn::system(prompt));
                }
                messages.extend(turns);
                messages
            }
        };

        let agent = (self.create_agent)(model, tools)?;
        Ok((agent, messages))
    }
}

/// Text of a final agent result.
///
/// Strings are returned as-is. Objects yield their string `output` or
/// `content` field, or the `content` of the last entry in `messages`.
/// Anything else is rendered as JSON.
pub fn final_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Object(map) => {
            for key in ["output", "content"] {
                if let Some(Value::String(text)) = map.get(key) {
                    return text.clone();
                }
            }
            let last_message = map
                .get("messages")
                .and_then(Value::as_array)
                .and_then(|messages| messages.last());
            match last_message {
                Some(Value::String(text)) => text.clone(),
                Some(message) => match message.get("content") {
                    Some(Value::String(text)) => text.clone(),
                    _ => spaced(value),
                },
                None => spaced(value),
            }
        }
        other => spaced(other),
    }
}
