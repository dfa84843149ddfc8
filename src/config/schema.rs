//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files.
//! Every section defaults, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::request::spec::{DEFAULT_CONTENT_TYPE, DEFAULT_TIMEOUT_SECS};

/// Root configuration for the executor and the CLI.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Fallbacks for fields a request leaves unset.
    pub defaults: DefaultsConfig,

    /// Where trace lines go.
    pub trace: TraceConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

/// Per-request fallbacks.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Timeout used when a request's timeout is zero or negative.
    pub timeout_secs: u64,

    /// Content type for a non-empty body without one.
    pub content_type: String,

    /// Redirect hops followed when auto-redirect is on.
    pub max_redirects: usize,

    /// Optional `User-Agent` sent on every request.
    pub user_agent: Option<String>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            max_redirects: 10,
            user_agent: None,
        }
    }
}

/// Trace sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Forward to the `tracing` subscriber.
    #[default]
    Log,
    /// Plain lines on stderr.
    Stderr,
    /// Drop all trace lines.
    None,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TraceConfig {
    pub sink: SinkKind,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Record metrics through the `metrics` facade.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
        }
    }
}
