//! Tool-signal recognition: fragment buffering, extraction, status rendering.

pub mod buffer;
pub mod extract;
pub mod summary;

pub use buffer::{ArgumentBuffer, DEFAULT_CALL_ID};
pub use extract::extract_tool_event;
pub use summary::{describe_tool_event, summarize_args};
