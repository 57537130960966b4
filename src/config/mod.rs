//! Configuration system (layered: defaults < TOML file < environment).

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Deserialize;

use crate::error::RelayError;
use crate::stream_transform::DEFAULT_CHUNK_WIDTH;
use crate::util::retry::{PlanOverride, RetryPolicy};

/// Global default config (lazy-initialized from file and env).
static DEFAULT_CONFIG: OnceLock<RelayConfig> = OnceLock::new();

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "RELAY_CONFIG";

const CONFIG_FILE_NAME: &str = "relay.toml";

/// Relay settings shared by every run in the process.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayConfig {
    /// Model name reported in outward chunks.
    pub model: String,
    /// Characters per outward content fragment.
    pub chunk_width: usize,
    /// Outward channel capacity; `None` is unbounded.
    pub channel_capacity: Option<usize>,
    pub system_prompt: Option<String>,
    /// Process-wide default retry policy for tools.
    pub retry: RetryPolicy,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            model: "agent".to_string(),
            chunk_width: DEFAULT_CHUNK_WIDTH,
            channel_capacity: None,
            system_prompt: None,
            retry: RetryPolicy::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    model: Option<String>,
    chunk_width: Option<usize>,
    channel_capacity: Option<usize>,
    system_prompt: Option<String>,
    retry: FileRetry,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileRetry {
    max_retries: Option<i64>,
    backoff_seconds: Option<f64>,
    backoff_factor: Option<f64>,
    timeout_seconds: Option<i64>,
}

impl RelayConfig {
    /// Parse a TOML document layered over the defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, RelayError> {
        let file: FileConfig =
            toml::from_str(text).map_err(|e| RelayError::Configuration(e.to_string()))?;
        Ok(Self::default().with_file(file))
    }

    pub fn from_file(path: &Path) -> Result<Self, RelayError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            RelayError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// `relay.toml` in the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "agent-relay")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Load from `$RELAY_CONFIG` or the default path, then apply `RELAY_*`
    /// environment variables. A `.env` file is honored if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .or_else(|| Self::default_path().filter(|p| p.is_file()));

        let base = match path {
            Some(path) => Self::from_file(&path).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable config file");
                Self::default()
            }),
            None => Self::default(),
        };

        base.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Get (or create) the global default config.
    pub fn global() -> &'static RelayConfig {
        DEFAULT_CONFIG.get_or_init(Self::from_env)
    }

    /// Apply `RELAY_*` overrides read through `lookup`.
    ///
    /// Values that fail to parse are skipped with a warning.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = lookup("RELAY_MODEL").filter(|m| !m.is_empty()) {
            self.model = model;
        }
        if let Some(width) = parse_env(&lookup, "RELAY_CHUNK_WIDTH") {
            self.chunk_width = width;
        }
        if let Some(capacity) = parse_env::<usize, _>(&lookup, "RELAY_CHANNEL_CAPACITY") {
            self.channel_capacity = (capacity > 0).then_some(capacity);
        }
        if let Some(prompt) = lookup("RELAY_SYSTEM_PROMPT") {
            self.system_prompt = Some(prompt).filter(|p| !p.is_empty());
        }
        if let Some(factor) = parse_env(&lookup, "RELAY_BACKOFF_FACTOR") {
            self.retry.backoff_factor = factor;
        }

        let plan = PlanOverride {
            max_retries: parse_env(&lookup, "RELAY_MAX_RETRIES"),
            backoff_seconds: parse_env(&lookup, "RELAY_BACKOFF_SECONDS"),
            timeout_seconds: parse_env(&lookup, "RELAY_TIMEOUT_SECONDS"),
        };
        self.retry = self.retry.merged(Some(&plan));
        self
    }

    fn with_file(mut self, file: FileConfig) -> Self {
        if let Some(model) = file.model {
            self.model = model;
        }
        if let Some(width) = file.chunk_width {
            self.chunk_width = width;
        }
        self.channel_capacity = file.channel_capacity.filter(|n| *n > 0);
        self.system_prompt = file.system_prompt.filter(|p| !p.is_empty());

        if let Some(factor) = file.retry.backoff_factor {
            self.retry.backoff_factor = factor;
        }
        let plan = PlanOverride {
            max_retries: file.retry.max_retries,
            backoff_seconds: file.retry.backoff_seconds,
            timeout_seconds: file.retry.timeout_seconds,
        };
        self.retry = self.retry.merged(Some(&plan));
        self
    }
}

fn parse_env<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparseable environment override");
            None
        }
    }
}
