//! Trace line types.

use std::fmt;

/// Semantic category of a trace line, for sinks that style or filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceCategory {
    RequestMeta,
    RequestHeader,
    RequestCookie,
    RequestBody,
    ResponseStatus,
    ResponseHeader,
    ResponseRaw,
    ResponseBody,
    NoHeadersMarker,
}

impl TraceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TraceCategory::RequestMeta => "request-meta",
            TraceCategory::RequestHeader => "request-header",
            TraceCategory::RequestCookie => "request-cookie",
            TraceCategory::RequestBody => "request-body",
            TraceCategory::ResponseStatus => "response-status",
            TraceCategory::ResponseHeader => "response-header",
            TraceCategory::ResponseRaw => "response-raw",
            TraceCategory::ResponseBody => "response-body",
            TraceCategory::NoHeadersMarker => "no-headers-marker",
        }
    }

    pub fn is_request(&self) -> bool {
        matches!(
            self,
            TraceCategory::RequestMeta
                | TraceCategory::RequestHeader
                | TraceCategory::RequestCookie
                | TraceCategory::RequestBody
        )
    }
}

impl fmt::Display for TraceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One annotated line of a call's trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    pub category: TraceCategory,
    pub text: String,
}

impl TraceEvent {
    pub fn new(category: TraceCategory, text: impl Into<String>) -> Self {
        Self {
            category,
            text: text.into(),
        }
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
