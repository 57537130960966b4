//! Best-effort status and message notifications.
//!
//! A [`Sink`] is chosen at registration time as either an immediate callback
//! or one returning a future. Delivery failures, including panics inside the
//! sink, are logged and dropped; they never reach the caller.

use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RelayError;
use crate::types::Role;

/// Payload handed to a sink: `{"type": "status"|"message", "data": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Notification {
    Status(StatusNotification),
    Message(MessageNotification),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusNotification {
    pub description: String,
    pub done: bool,
    pub hidden: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageNotification {
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub meta: Value,
}

type ImmediateFn = dyn Fn(Notification) -> Result<(), RelayError> + Send + Sync;
type SuspendingFn = dyn Fn(Notification) -> BoxFuture<'static, Result<(), RelayError>> + Send + Sync;

/// Notification receiver.
#[derive(Clone)]
pub enum Sink {
    /// Completes delivery before returning.
    Immediate(Arc<ImmediateFn>),
    /// Returns a future that is awaited.
    Suspending(Arc<SuspendingFn>),
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Immediate(_) => f.write_str("Sink::Immediate(..)"),
            Self::Suspending(_) => f.write_str("Sink::Suspending(..)"),
        }
    }
}

impl Sink {
    pub fn immediate<F>(callback: F) -> Self
    where
        F: Fn(Notification) -> Result<(), RelayError> + Send + Sync + 'static,
    {
        Self::Immediate(Arc::new(callback))
    }

    pub fn suspending<F, Fut>(callback: F) -> Self
    where
        F: Fn(Notification) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), RelayError>> + Send + 'static,
    {
        Self::Suspending(Arc::new(move |notification| callback(notification).boxed()))
    }

    /// Deliver one notification, converting panics into [`RelayError::Sink`].
    pub async fn deliver(&self, notification: Notification) -> Result<(), RelayError> {
        match self {
            Self::Immediate(callback) => {
                std::panic::catch_unwind(AssertUnwindSafe(|| callback(notification)))
                    .unwrap_or_else(|_| Err(RelayError::Sink("sink panicked".to_string())))
            }
            Self::Suspending(callback) => {
                let future = std::panic::catch_unwind(AssertUnwindSafe(|| callback(notification)))
                    .map_err(|_| RelayError::Sink("sink panicked".to_string()))?;
                AssertUnwindSafe(future)
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|_| Err(RelayError::Sink("sink panicked".to_string())))
            }
        }
    }
}

/// Send a status notification. No-op without a sink.
pub async fn emit_status(sink: Option<&Sink>, description: impl Into<String>, done: bool, hidden: bool) {
    let notification = Notification::Status(StatusNotification {
        description: description.into(),
        done,
        hidden,
    });
    emit(sink, notification).await;
}

/// Send a message notification. No-op without a sink.
pub async fn emit_message(sink: Option<&Sink>, content: impl Into<String>, role: Role, meta: Option<Value>) {
    let notification = Notification::Message(MessageNotification {
        role,
        content: content.into(),
        meta: meta.unwrap_or(Value::Null),
    });
    emit(sink, notification).await;
}

async fn emit(sink: Option<&Sink>, notification: Notification) {
    let Some(sink) = sink else {
        return;
    };
    if let Err(error) = sink.deliver(notification).await {
        tracing::warn!(error = %error, "dropping notification after sink failure");
    }
}
