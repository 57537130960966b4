//! agent-relay: streaming bridge from an agent's execution log to the wire.
//!
//! Turns the step-by-step run log of a tool-using agent into two outward
//! channels: chat-completion chunks for generated text, and best-effort status
//! notifications for tool calls whose arguments may arrive in fragments.
//! Tools handed to the agent are wrapped with retry, backoff and timeout.
//!
//! # Quick Start
//!
//! ```no_run
//! use agent_relay::prelude::*;
//! use agent_relay::agent::ReplayAgent;
//! use agent_relay::stream_transform::{outbound_channel, sse_frames};
//! use futures::StreamExt;
//!
//! # async fn example() -> agent_relay::error::Result<()> {
//! let agent = ReplayAgent::from_json_lines(r#"{"ops":[{"op":"add","path":"/streamed_output/-","value":"Hello"}]}"#)?;
//! let driver = ExecutionDriver::new(|| Ok(()), move |_model: (), _tools| {
//!     Ok(Box::new(agent.clone()) as Box<dyn LogAgent>)
//! });
//!
//! let (tx, rx) = outbound_channel(None);
//! let encoder = DeltaEncoder::new(tx, "demo-model");
//! driver
//!     .relay(RunInput::new(vec![MessageRecord::new("user", "hi")]), &encoder, None)
//!     .await?;
//! drop(encoder);
//!
//! let mut frames = sse_frames(rx);
//! while let Some(frame) = frames.next().await {
//!     print!("{}", frame?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod dialogue;
pub mod error;
pub mod notify;
pub mod prelude;
pub mod stream_transform;
pub mod tool_events;
pub mod tools;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
