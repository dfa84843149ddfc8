//! Caller-supplied inputs for one request.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::request::pairs::OrderedPairs;
use crate::request::version::ProtocolVersion;

/// Fallback used when the caller's timeout is zero or negative.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Content type attached to a non-empty body when the caller gives none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Everything needed to assemble and send one HTTP request.
///
/// All fields default, so a request file may carry only `url`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RequestSpec {
    /// Method, passed to the transport verbatim.
    pub method: String,

    pub url: String,

    /// Request body. Empty means no body and no content type.
    pub body: String,

    /// Content type for a non-empty body.
    pub content_type: Option<String>,

    /// Extra request headers, sent in this order.
    pub headers: OrderedPairs,

    /// Cookies folded into one `Cookie` header.
    pub cookies: OrderedPairs,

    /// Overall timeout in seconds; `<= 0` selects the default.
    pub timeout_secs: i64,

    /// Also render the raw response bytes as hex in the trace.
    pub raw_output: bool,

    /// Version ceiling as a free-form string ("1.1", "2.0", "3.0").
    pub version: Option<String>,

    /// Follow 3xx responses that carry a `Location`.
    pub auto_redirect: bool,
}

impl Default for RequestSpec {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            url: String::new(),
            body: String::new(),
            content_type: None,
            headers: OrderedPairs::new(),
            cookies: OrderedPairs::new(),
            timeout_secs: 0,
            raw_output: false,
            version: None,
            auto_redirect: true,
        }
    }
}

impl RequestSpec {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn protocol_version(&self) -> ProtocolVersion {
        ProtocolVersion::resolve(self.version.as_deref())
    }

    /// `name1=value1; name2=value2` in mapping order, or `None` when there are
    /// no cookies.
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        let joined = self
            .cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ");
        Some(joined)
    }
}

/// Positive values are taken as seconds; anything else yields `default_secs`.
pub fn effective_timeout(secs: i64, default_secs: u64) -> Duration {
    if secs > 0 {
        Duration::from_secs(secs as u64)
    } else {
        Duration::from_secs(default_secs)
    }
}
