//! Core types for agent-relay.

pub mod log;
pub mod message;
pub mod stream;
pub mod tool_event;

pub use log::*;
pub use message::*;
pub use stream::*;
pub use tool_event::*;
