//! Dialogue message types.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Conversation role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Map a free-form record role onto the canonical set.
    ///
    /// `system` and `assistant`/`ai` are recognized; every other role
    /// (`user`, `human`, `tool`, ...) is treated as user input.
    pub fn from_record(role: &str) -> Self {
        match role.trim().to_ascii_lowercase().as_str() {
            "system" => Self::System,
            "assistant" | "ai" => Self::Assistant,
            _ => Self::User,
        }
    }
}

/// One canonical dialogue turn handed to the agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DialogueTurn {
    pub role: Role,
    pub content: String,
}

impl DialogueTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// A generic `{role, content}` record as supplied by callers.
///
/// `content` is usually text but may be any JSON value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageRecord {
    pub role: String,
    #[serde(default)]
    pub content: serde_json::Value,
}

impl MessageRecord {
    pub fn new(role: impl Into<String>, content: impl Into<serde_json::Value>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}
