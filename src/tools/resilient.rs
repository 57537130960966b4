//! Retry/timeout wrapper applied to tools before the agent sees them.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::arguments::ToolArguments;
use super::tool::{Tool, ToolExecutionContext};
use crate::error::RelayError;
use crate::util::retry::{RetryPolicy, RetryPredicate};

/// A tool whose calls are retried with backoff and bounded by a timeout.
///
/// Each call may carry `max_retries`, `backoff_seconds` and `timeout_seconds`
/// among its arguments. Those keys are stripped before the inner tool runs
/// and layered over the wrapper's policy for that call only.
pub struct ResilientTool {
    inner: Arc<dyn Tool>,
    policy: RetryPolicy,
    retry_on: RetryPredicate,
}

impl ResilientTool {
    pub fn new(inner: Arc<dyn Tool>, policy: RetryPolicy) -> Self {
        Self {
            inner,
            policy,
            retry_on: Arc::new(RelayError::is_retryable),
        }
    }

    /// Replace the set of errors that trigger a retry.
    pub fn retry_on<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&RelayError) -> bool + Send + Sync + 'static,
    {
        self.retry_on = Arc::new(predicate);
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Wrap every tool with `policy`.
    pub fn wrap_all(tools: Vec<Arc<dyn Tool>>, policy: &RetryPolicy) -> Vec<Arc<dyn Tool>> {
        tools
            .into_iter()
            .map(|tool| Arc::new(Self::new(tool, policy.clone())) as Arc<dyn Tool>)
            .collect()
    }
}

#[async_trait]
impl Tool for ResilientTool {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn description(&self) -> &str {
        self.inner.description()
    }

    fn parameters(&self) -> &Value {
        self.inner.parameters()
    }

    async fn execute(&self, args: &ToolArguments, ctx: &ToolExecutionContext) -> Result<Value, RelayError> {
        let mut args = args.clone();
        let plan = args.take_plan();
        let policy = self.policy.merged(plan.as_ref());

        if let Some(plan) = &plan {
            tracing::debug!(tool = self.inner.name(), ?plan, "applying plan override");
        }

        policy
            .execute_if(self.retry_on.as_ref(), || {
                let inner = Arc::clone(&self.inner);
                let args = args.clone();
                let ctx = ctx.clone();
                async move { inner.execute(&args, &ctx).await }
            })
            .await
    }
}

impl std::fmt::Debug for ResilientTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilientTool")
            .field("tool", &self.inner.name())
            .field("policy", &self.policy)
            .finish()
    }
}
