//! Error types for agent-relay.

pub mod unified;

pub use unified::ErrorCategory;

use thiserror::Error;

/// Primary error type for all relay operations.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Transient failure: {0}")]
    Transient(String),

    #[error("Tool execution error: {tool_name}: {message}")]
    ToolExecution { tool_name: String, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Outbound channel closed")]
    ChannelClosed,

    #[error("Sink error: {0}")]
    Sink(String),
}

impl RelayError {
    /// Create a transient (retryable) failure.
    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transient(message.into())
    }

    /// Create a tool execution failure.
    pub fn tool(tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolExecution {
            tool_name: tool_name.into(),
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Io(_) => ErrorCategory::Io,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::Timeout(_) => ErrorCategory::Timeout,
            Self::Transient(_) => ErrorCategory::Transient,
            Self::ToolExecution { .. } => ErrorCategory::ToolExecution,
            Self::InvalidArgument(_) => ErrorCategory::InvalidInput,
            Self::Agent(_) | Self::Stream(_) => ErrorCategory::Agent,
            Self::ChannelClosed | Self::Sink(_) => ErrorCategory::Delivery,
        }
    }

    /// Whether the resilient invocation wrapper retries this error by default.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Timeout | ErrorCategory::Transient
        )
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, RelayError>;
