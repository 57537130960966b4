//! Per-run output callbacks.

use async_trait::async_trait;

use crate::error::RelayError;
use crate::notify::{emit_status, Sink};
use crate::stream_transform::DeltaEncoder;
use crate::tool_events::describe_tool_event;
use crate::types::NormalizedToolEvent;

/// Receives a streaming run's output.
///
/// Every text fragment reaches `on_content`, including text that arrives in
/// the same event as a tool signal. Filtering tool-argument text out of the
/// content channel is up to the implementation.
#[async_trait]
pub trait RunObserver: Send {
    /// One fixed-width text fragment. An error stops the run.
    async fn on_content(&mut self, fragment: &str) -> Result<(), RelayError>;

    /// A tool signal recovered from the log. Ignored by default.
    async fn on_tool_event(&mut self, _event: &NormalizedToolEvent) -> Result<(), RelayError> {
        Ok(())
    }
}

/// Forwards content to a [`DeltaEncoder`] and tool events to a status sink.
#[derive(Debug, Clone)]
pub struct RelayObserver {
    encoder: DeltaEncoder,
    status_sink: Option<Sink>,
}

impl RelayObserver {
    pub fn new(encoder: DeltaEncoder, status_sink: Option<Sink>) -> Self {
        Self { encoder, status_sink }
    }
}

#[async_trait]
impl RunObserver for RelayObserver {
    async fn on_content(&mut self, fragment: &str) -> Result<(), RelayError> {
        self.encoder.send_delta(fragment).await
    }

    async fn on_tool_event(&mut self, event: &NormalizedToolEvent) -> Result<(), RelayError> {
        emit_status(
            self.status_sink.as_ref(),
            describe_tool_event(event),
            event.complete,
            false,
        )
        .await;
        Ok(())
    }
}
