//! Tool surface handed to the agent.

pub mod arguments;
pub mod resilient;
pub mod tool;

pub use arguments::ToolArguments;
pub use resilient::ResilientTool;
pub use tool::{AgentTool, Tool, ToolExecutionContext};
