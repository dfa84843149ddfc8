//! Per-call transport construction.
//!
//! # Responsibilities
//! - Apply the protocol version ceiling
//! - Apply redirect policy, connect and overall timeouts
//! - Route through the caller's proxy, or connect directly
//!
//! # Design Decisions
//! - One client per call; idle pooling is disabled so nothing outlives it
//! - HTTP/2 and HTTP/3 ceilings both negotiate via ALPN and may land on
//!   HTTP/1.1; only an HTTP/1.1 ceiling pins the client to HTTP/1.1
//! - System proxy settings are ignored when no proxy is given

use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::{Client, Proxy};

use crate::executor::error::{error_chain, ExecResult, ExecutionError};
use crate::request::proxy::ProxyDescriptor;
use crate::request::version::ProtocolVersion;

/// Knobs for one client.
#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub ceiling: ProtocolVersion,
    pub timeout: Duration,
    pub auto_redirect: bool,
    pub max_redirects: usize,
    pub user_agent: Option<String>,
}

/// Build a client scoped to a single call.
pub fn build_client(
    options: &TransportOptions,
    proxy: Option<&ProxyDescriptor>,
) -> ExecResult<Client> {
    let redirect = if options.auto_redirect {
        Policy::limited(options.max_redirects)
    } else {
        Policy::none()
    };

    let mut builder = Client::builder()
        .timeout(options.timeout)
        .connect_timeout(options.timeout)
        .pool_max_idle_per_host(0)
        .redirect(redirect);

    if !options.ceiling.allows_http2() {
        builder = builder.http1_only();
    }

    builder = match proxy {
        Some(descriptor) => builder.proxy(proxy_for(descriptor)?),
        None => builder.no_proxy(),
    };

    if let Some(user_agent) = &options.user_agent {
        builder = builder.user_agent(user_agent.as_str());
    }

    builder.build().map_err(|e| {
        ExecutionError::Network(format!("transport setup failed: {}", error_chain(&e)))
    })
}

fn proxy_for(descriptor: &ProxyDescriptor) -> ExecResult<Proxy> {
    let url = descriptor.proxy_url();
    let proxy = Proxy::all(&url)
        .map_err(|e| ExecutionError::InvalidRequest(format!("proxy '{}': {}", url, e)))?;

    Ok(match &descriptor.credentials {
        Some(credentials) => proxy.basic_auth(&credentials.username, &credentials.password),
        None => proxy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::error::ErrorKind;
    use crate::request::proxy::ProxyKind;

    fn options(ceiling: ProtocolVersion) -> TransportOptions {
        TransportOptions {
            ceiling,
            timeout: Duration::from_secs(5),
            auto_redirect: true,
            max_redirects: 10,
            user_agent: None,
        }
    }

    #[test]
    fn test_builds_for_every_ceiling() {
        for ceiling in [ProtocolVersion::Http1_1, ProtocolVersion::Http2, ProtocolVersion::Http3] {
            assert!(build_client(&options(ceiling), None).is_ok());
        }
    }

    #[test]
    fn test_builds_with_authenticated_proxies() {
        let http = ProxyDescriptor::new("127.0.0.1", 3128).with_credentials("u", "p");
        assert!(build_client(&options(ProtocolVersion::Http2), Some(&http)).is_ok());

        let socks = ProxyDescriptor::new("127.0.0.1", 1080)
            .with_kind(ProxyKind::Socks5)
            .with_credentials("u", "p");
        assert!(build_client(&options(ProtocolVersion::Http1_1), Some(&socks)).is_ok());
    }

    #[test]
    fn test_bad_proxy_host_is_invalid_request() {
        let proxy = ProxyDescriptor::new("bad host", 3128);
        let err = build_client(&options(ProtocolVersion::Http1_1), Some(&proxy)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }
}
