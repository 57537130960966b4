//! Normalized tool signal.

use serde::{Deserialize, Serialize};

/// Tool-call information recovered from one execution-log event.
///
/// `complete == true` implies `args_preview` parses as a JSON object or array.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizedToolEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Raw or accumulated JSON text of the arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args_preview: Option<String>,
    pub complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
}
