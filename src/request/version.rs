//! Protocol version ceiling.
//!
//! # Design Decisions
//! - Exact string match only; no trimming or case folding
//! - The fallback to HTTP/1.1 is an explicit arm, not a wildcard on the enum
//! - The resolved value is a ceiling: the transport may settle lower

use std::fmt;

use reqwest::Version;

/// Highest HTTP version a single call is allowed to negotiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProtocolVersion {
    #[default]
    Http1_1,
    Http2,
    Http3,
}

impl ProtocolVersion {
    /// Map a caller-supplied version string to a ceiling.
    ///
    /// `"3.0"` and `"2.0"` select HTTP/3 and HTTP/2. Everything else,
    /// including `None`, `""` and `"1.1"`, selects HTTP/1.1.
    pub fn resolve(input: Option<&str>) -> Self {
        match input {
            Some("3.0") => ProtocolVersion::Http3,
            Some("2.0") => ProtocolVersion::Http2,
            Some(_) | None => ProtocolVersion::Http1_1,
        }
    }

    /// Whether the transport may offer HTTP/2 during negotiation.
    pub fn allows_http2(&self) -> bool {
        !matches!(self, ProtocolVersion::Http1_1)
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolVersion::Http1_1 => write!(f, "HTTP/1.1"),
            ProtocolVersion::Http2 => write!(f, "HTTP/2.0"),
            ProtocolVersion::Http3 => write!(f, "HTTP/3.0"),
        }
    }
}

/// Render a negotiated wire version the same way the ceiling is rendered.
pub fn negotiated_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2.0",
        Version::HTTP_3 => "HTTP/3.0",
        _ => "HTTP/?",
    }
}
