//! Collaborator contracts the driver runs against.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::stream::BoxStream;
use futures::FutureExt;
use serde_json::Value;

use crate::error::RelayError;
use crate::tools::Tool;
use crate::types::{DialogueTurn, RawLogEvent};

/// An agent constructed for one run.
#[async_trait]
pub trait LogAgent: Send + Sync {
    /// Lazy, in-order, finite execution log for `messages`.
    fn stream_log(&self, messages: Vec<DialogueTurn>) -> BoxStream<'static, Result<RawLogEvent, RelayError>>;

    /// Run to completion and return the final value.
    async fn invoke(&self, messages: Vec<DialogueTurn>) -> Result<Value, RelayError>;
}

/// Builds the model handle for a run.
pub type MakeLlmFn<M> = Arc<dyn Fn() -> Result<M, RelayError> + Send + Sync>;

/// Builds the agent from a model and the (already wrapped) tools.
pub type CreateAgentFn<M> =
    Arc<dyn Fn(M, Vec<Arc<dyn Tool>>) -> Result<Box<dyn LogAgent>, RelayError> + Send + Sync>;

/// Loads the tools offered to the agent when the caller supplies none.
pub type LoadToolsFn =
    Arc<dyn Fn() -> BoxFuture<'static, Result<Vec<Arc<dyn Tool>>, RelayError>> + Send + Sync>;

/// Box an async tool loader.
pub fn tool_loader<F, Fut>(loader: F) -> LoadToolsFn
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<Arc<dyn Tool>>, RelayError>> + Send + 'static,
{
    Arc::new(move || loader().boxed())
}
