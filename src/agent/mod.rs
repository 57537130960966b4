//! Agent runs: collaborator contracts, the execution driver, observers.

pub mod contract;
pub mod driver;
pub mod observer;
pub mod replay;

pub use contract::{tool_loader, CreateAgentFn, LoadToolsFn, LogAgent, MakeLlmFn};
pub use driver::{final_text, ExecutionDriver, RunInput, RunMessages, RunStats};
pub use observer::{RelayObserver, RunObserver};
pub use replay::ReplayAgent;
