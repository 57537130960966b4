//! Wraps text fragments as chat-completion chunks.

use chrono::Utc;
use uuid::Uuid;

use super::channel::OutboundSender;
use crate::error::RelayError;
use crate::types::{DeltaChunk, OutboundFrame};

/// Encodes fragments for one stream and pushes them onto the outward channel.
///
/// The stream id is fixed at construction; each chunk gets a fresh timestamp.
#[derive(Debug, Clone)]
pub struct DeltaEncoder {
    stream_id: String,
    model: String,
    outbound: OutboundSender,
}

impl DeltaEncoder {
    pub fn new(outbound: OutboundSender, model: impl Into<String>) -> Self {
        Self {
            stream_id: format!("chatcmpl-{}", Uuid::new_v4().simple()),
            model: model.into(),
            outbound,
        }
    }

    pub fn stream_id(&self) -> &str {
        &self.stream_id
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the chunk for `fragment` without sending it.
    pub fn chunk(&self, fragment: &str) -> DeltaChunk {
        DeltaChunk::content(&self.stream_id, Utc::now().timestamp(), &self.model, fragment)
    }

    /// Push one content chunk. Empty fragments are ignored.
    pub async fn send_delta(&self, fragment: &str) -> Result<(), RelayError> {
        if fragment.is_empty() {
            return Ok(());
        }
        self.outbound.push(OutboundFrame::Chunk(self.chunk(fragment))).await
    }

    /// Push the end-of-stream marker.
    pub async fn send_done(&self) -> Result<(), RelayError> {
        self.outbound.push(OutboundFrame::Done).await
    }
}
