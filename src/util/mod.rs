//! Utility modules: retry with per-attempt timeouts, JSON rendering.

pub mod json;
pub mod retry;
