//! Convenience re-exports for common use.

pub use crate::agent::{ExecutionDriver, LogAgent, RunInput, RunObserver, RunStats};
pub use crate::config::RelayConfig;
pub use crate::error::{RelayError, Result};
pub use crate::notify::{emit_message, emit_status, Notification, Sink};
pub use crate::stream_transform::DeltaEncoder;
pub use crate::tools::{AgentTool, ResilientTool, Tool, ToolArguments};
pub use crate::types::{
    DeltaChunk, DialogueTurn, MessageRecord, NormalizedToolEvent, OutboundFrame, RawLogEvent, Role,
};
pub use crate::util::retry::{PlanOverride, RetryPolicy};
