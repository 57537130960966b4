//! Outward streaming wire types (chat-completion chunk format).

use serde::{Deserialize, Serialize};

/// `object` field carried by every content chunk.
pub const CHUNK_OBJECT: &str = "chat.completion.chunk";

/// Payload of the terminal frame.
pub const DONE_SENTINEL: &str = "[DONE]";

/// One chat-completion streaming chunk carrying a single content fragment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeltaChunk {
    pub id: String,
    pub object: String,
    /// Unix seconds.
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChunkChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkChoice {
    pub index: u32,
    pub delta: ChunkDelta,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkDelta {
    pub content: String,
}

impl DeltaChunk {
    /// Build a content chunk with a single choice at index 0.
    pub fn content(
        id: impl Into<String>,
        created: i64,
        model: impl Into<String>,
        fragment: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            object: CHUNK_OBJECT.to_string(),
            created,
            model: model.into(),
            choices: vec![ChunkChoice {
                index: 0,
                delta: ChunkDelta {
                    content: fragment.into(),
                },
                finish_reason: None,
            }],
        }
    }

    /// Content of the first choice.
    pub fn text(&self) -> &str {
        self.choices
            .first()
            .map(|c| c.delta.content.as_str())
            .unwrap_or_default()
    }
}

/// Item travelling through the outward channel.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundFrame {
    Chunk(DeltaChunk),
    /// End of stream.
    Done,
}

impl OutboundFrame {
    /// Render as a server-sent-events `data:` frame.
    pub fn to_sse(&self) -> Result<String, serde_json::Error> {
        match self {
            Self::Chunk(chunk) => Ok(format!("data: {}\n\n", serde_json::to_string(chunk)?)),
            Self::Done => Ok(format!("data: {DONE_SENTINEL}\n\n")),
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}
