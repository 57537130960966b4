//! Error classification.

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Io,
    Serialization,
    Timeout,
    Transient,
    ToolExecution,
    InvalidInput,
    Agent,
    Delivery,
}
