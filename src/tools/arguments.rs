//! Typed access to tool call arguments.

use serde_json::Value;

use crate::error::RelayError;
use crate::util::retry::PlanOverride;

/// Wrapper around tool call arguments providing typed extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolArguments {
    value: Value,
}

impl ToolArguments {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    pub fn raw(&self) -> &Value {
        &self.value
    }

    pub fn into_inner(self) -> Value {
        self.value
    }

    pub fn get_str(&self, key: &str) -> Result<&str, RelayError> {
        self.value
            .get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| RelayError::InvalidArgument(format!("Missing string argument: {key}")))
    }

    pub fn get_str_opt(&self, key: &str) -> Option<&str> {
        self.value.get(key).and_then(Value::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Result<i64, RelayError> {
        self.value
            .get(key)
            .and_then(Value::as_i64)
            .ok_or_else(|| RelayError::InvalidArgument(format!("Missing integer argument: {key}")))
    }

    /// Remove plan override keys, returning the override if any were present.
    ///
    /// Only object-shaped arguments can carry a plan.
    pub fn take_plan(&mut self) -> Option<PlanOverride> {
        self.value.as_object_mut().and_then(PlanOverride::take_from)
    }

    /// Deserialize the entire arguments into a typed struct.
    ///
    /// String-encoded JSON is parsed first; an empty string means `{}`.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Result<T, RelayError> {
        let value = match &self.value {
            Value::String(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    serde_json::json!({})
                } else {
                    serde_json::from_str::<Value>(trimmed).map_err(|e| {
                        RelayError::InvalidArgument(format!("Failed to deserialize arguments: {e}"))
                    })?
                }
            }
            other => other.clone(),
        };
        serde_json::from_value(value)
            .map_err(|e| RelayError::InvalidArgument(format!("Failed to deserialize arguments: {e}")))
    }
}
