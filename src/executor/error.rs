//! Failure kinds for a single execution and their classification.

use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Coarse failure category, stable for callers and metrics labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidRequest,
    ProxyUnreachable,
    ProxyAuthFailed,
    NetworkError,
    Timeout,
    DecodeError,
    Cancelled,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidRequest => "InvalidRequest",
            ErrorKind::ProxyUnreachable => "ProxyUnreachable",
            ErrorKind::ProxyAuthFailed => "ProxyAuthFailed",
            ErrorKind::NetworkError => "NetworkError",
            ErrorKind::Timeout => "Timeout",
            ErrorKind::DecodeError => "DecodeError",
            ErrorKind::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that end an execution. No partial response text is ever returned
/// alongside one of these.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// Method, URL, header or content type rejected before sending.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Could not connect to, or tunnel through, the configured proxy.
    #[error("Proxy unreachable: {0}")]
    ProxyUnreachable(String),

    /// The proxy rejected the supplied credentials (or demanded some).
    #[error("Proxy authentication failed: {0}")]
    ProxyAuthFailed(String),

    /// Connection reset, DNS, TLS, or an interrupted body read.
    #[error("Network error: {0}")]
    Network(String),

    /// The overall deadline elapsed.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Non-recoverable transport decoding failure.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Cancelled by the caller before completion.
    #[error("Request cancelled")]
    Cancelled,
}

impl ExecutionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExecutionError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            ExecutionError::ProxyUnreachable(_) => ErrorKind::ProxyUnreachable,
            ExecutionError::ProxyAuthFailed(_) => ErrorKind::ProxyAuthFailed,
            ExecutionError::Network(_) => ErrorKind::NetworkError,
            ExecutionError::Timeout(_) => ErrorKind::Timeout,
            ExecutionError::Decode(_) => ErrorKind::DecodeError,
            ExecutionError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Map a transport error to a failure kind.
    ///
    /// `via_proxy` tells whether the call was routed through a proxy; connect
    /// failures are only blamed on the proxy when one was in use.
    pub fn from_transport(err: &reqwest::Error, via_proxy: bool, timeout: Duration) -> Self {
        let detail = error_chain(err);

        if err.is_timeout() {
            ExecutionError::Timeout(timeout.as_secs())
        } else if via_proxy && mentions_proxy_auth(err) {
            ExecutionError::ProxyAuthFailed(detail)
        } else if via_proxy && (err.is_connect() || mentions(err, &["unsuccessful tunnel"])) {
            ExecutionError::ProxyUnreachable(detail)
        } else if err.is_builder() {
            ExecutionError::InvalidRequest(detail)
        } else if err.is_decode() {
            ExecutionError::Decode(detail)
        } else {
            ExecutionError::Network(detail)
        }
    }
}

/// Result type for executor operations.
pub type ExecResult<T> = Result<T, ExecutionError>;

/// Flatten an error and all of its sources into `outer: inner: root`.
pub fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !out.contains(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = inner.source();
    }
    out
}

fn mentions_proxy_auth(err: &(dyn StdError + 'static)) -> bool {
    mentions(
        err,
        &[
            "proxy authentication required",
            "authentication rejected",
            "authorization required",
        ],
    )
}

/// Case-insensitive search for any needle anywhere in the source chain.
fn mentions(err: &(dyn StdError + 'static), needles: &[&str]) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(e) = current {
        let text = e.to_string().to_ascii_lowercase();
        if needles.iter().any(|n| text.contains(n)) {
            return true;
        }
        current = e.source();
    }
    false
}
