//! Resolved forward proxy for a single call.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::executor::error::ExecutionError;

/// Forward proxy protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyKind {
    #[default]
    Http,
    Socks5,
}

impl ProxyKind {
    fn scheme(&self) -> &'static str {
        match self {
            ProxyKind::Http => "http",
            ProxyKind::Socks5 => "socks5",
        }
    }
}

/// Username/password pair for proxy authentication.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProxyCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for ProxyCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Where to route a call, owned by the caller and only read by the executor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProxyDescriptor {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub kind: ProxyKind,
    #[serde(default)]
    pub credentials: Option<ProxyCredentials>,
}

impl ProxyDescriptor {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            kind: ProxyKind::Http,
            credentials: None,
        }
    }

    pub fn with_kind(mut self, kind: ProxyKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some(ProxyCredentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    pub fn needs_authentication(&self) -> bool {
        self.credentials.is_some()
    }

    /// Proxy URL without credentials, e.g. `http://10.0.0.1:3128`.
    pub fn proxy_url(&self) -> String {
        format!("{}://{}:{}", self.kind.scheme(), self.host, self.port)
    }
}

impl fmt::Display for ProxyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.proxy_url())
    }
}

/// Parses `host:port`, `http://host:port` or `socks5://host:port`.
impl FromStr for ProxyDescriptor {
    type Err = ExecutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, rest) = match s.split_once("://") {
            Some(("http", rest)) => (ProxyKind::Http, rest),
            Some(("socks5", rest)) => (ProxyKind::Socks5, rest),
            Some((scheme, _)) => {
                return Err(ExecutionError::InvalidRequest(format!(
                    "unsupported proxy scheme '{}'",
                    scheme
                )))
            }
            None => (ProxyKind::Http, s),
        };

        let (host, port) = rest.rsplit_once(':').ok_or_else(|| {
            ExecutionError::InvalidRequest(format!("proxy '{}' is missing a port", s))
        })?;
        if host.is_empty() {
            return Err(ExecutionError::InvalidRequest(format!("proxy '{}' is missing a host", s)));
        }
        let port: u16 = port.parse().map_err(|e| {
            ExecutionError::InvalidRequest(format!("invalid proxy port '{}': {}", port, e))
        })?;

        Ok(ProxyDescriptor::new(host, port).with_kind(kind))
    }
}
