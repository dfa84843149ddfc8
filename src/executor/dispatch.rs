//! The request executor.
//!
//! # Responsibilities
//! - Resolve the version ceiling and effective timeout
//! - Validate inputs into a `PreparedRequest`
//! - Build a per-call transport and send exactly once
//! - Capture status, headers and the full body; decode it as lossy UTF-8
//! - Emit request and response trace blocks
//!
//! # Design Decisions
//! - Stateless across calls: the client lives on the stack of `run`, so it
//!   is dropped on every exit path, including timeout and cancellation
//! - The timeout bounds connect, handshake, write and body read together
//! - No retries; the first failure ends the call

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode, Version};
use tracing::Instrument;
use uuid::Uuid;

use crate::config::schema::{DefaultsConfig, ExecutorConfig};
use crate::executor::error::{error_chain, ExecResult, ExecutionError};
use crate::executor::transport::{build_client, TransportOptions};
use crate::lifecycle::cancel::CancelToken;
use crate::observability::metrics;
use crate::request::assemble::PreparedRequest;
use crate::request::proxy::ProxyDescriptor;
use crate::request::spec::{effective_timeout, RequestSpec};
use crate::request::version::negotiated_label;
use crate::trace::render;
use crate::trace::sink::{emit_all, NoopSink, TraceSink};

/// Everything captured from one response.
#[derive(Debug, Clone)]
pub struct ResponseRecord {
    pub status: StatusCode,
    /// Version actually negotiated on the wire.
    pub version: Version,
    pub headers: HeaderMap,
    pub raw: Vec<u8>,
    /// `raw` decoded as UTF-8, invalid sequences replaced.
    pub text: String,
}

impl ResponseRecord {
    fn capture(status: StatusCode, version: Version, headers: HeaderMap, raw: Vec<u8>) -> Self {
        let text = String::from_utf8_lossy(&raw).into_owned();
        Self {
            status,
            version,
            headers,
            raw,
            text,
        }
    }
}

/// Performs single-shot HTTP calls and reports each one to a trace sink.
#[derive(Clone)]
pub struct RequestExecutor {
    sink: Arc<dyn TraceSink>,
    defaults: DefaultsConfig,
    metrics_enabled: bool,
}

impl RequestExecutor {
    pub fn new(sink: Arc<dyn TraceSink>) -> Self {
        Self {
            sink,
            defaults: DefaultsConfig::default(),
            metrics_enabled: true,
        }
    }

    /// Executor that traces nothing.
    pub fn silent() -> Self {
        Self::new(Arc::new(NoopSink))
    }

    pub fn from_config(config: &ExecutorConfig, sink: Arc<dyn TraceSink>) -> Self {
        Self {
            sink,
            defaults: config.defaults.clone(),
            metrics_enabled: config.observability.metrics_enabled,
        }
    }

    /// Send `spec` once and return the decoded response body.
    pub async fn execute(
        &self,
        spec: &RequestSpec,
        proxy: Option<&ProxyDescriptor>,
    ) -> ExecResult<String> {
        self.execute_with_cancel(spec, proxy, &CancelToken::never()).await
    }

    /// Like [`execute`](Self::execute), but also ends with `Cancelled` as
    /// soon as `cancel` fires.
    pub async fn execute_with_cancel(
        &self,
        spec: &RequestSpec,
        proxy: Option<&ProxyDescriptor>,
        cancel: &CancelToken,
    ) -> ExecResult<String> {
        let span = tracing::info_span!(
            "execute",
            call_id = %Uuid::new_v4(),
            method = %spec.method,
            url = %spec.url,
        );

        async move {
            let start = Instant::now();
            let result = self.run(spec, proxy, cancel).await;

            match &result {
                Ok(record) => {
                    tracing::debug!(
                        status = record.status.as_u16(),
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Execution finished"
                    );
                    if self.metrics_enabled {
                        metrics::record_success(&spec.method, record.status.as_u16(), start);
                    }
                }
                Err(e) => {
                    tracing::warn!(kind = %e.kind(), error = %e, "Execution failed");
                    if self.metrics_enabled {
                        metrics::record_failure(&spec.method, e.kind(), start);
                    }
                }
            }

            result.map(|record| record.text)
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        spec: &RequestSpec,
        proxy: Option<&ProxyDescriptor>,
        cancel: &CancelToken,
    ) -> ExecResult<ResponseRecord> {
        let ceiling = spec.protocol_version();
        let timeout = effective_timeout(spec.timeout_secs, self.defaults.timeout_secs);
        let via_proxy = proxy.is_some();

        let prepared = PreparedRequest::assemble(spec, &self.defaults.content_type)?;

        let options = TransportOptions {
            ceiling,
            timeout,
            auto_redirect: spec.auto_redirect,
            max_redirects: self.defaults.max_redirects,
            user_agent: self.defaults.user_agent.clone(),
        };
        let client = build_client(&options, proxy)?;
        let route = proxy.map_or_else(|| "direct".to_string(), |p| p.to_string());
        tracing::debug!(
            ceiling = %ceiling,
            timeout_secs = timeout.as_secs(),
            route = %route,
            "Transport built"
        );

        let request = build_request(&client, prepared, via_proxy, timeout)?;

        emit_all(self.sink.as_ref(), render::request_block(spec, ceiling));

        let exchange = exchange(&client, request, via_proxy, timeout);
        let record = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ExecutionError::Cancelled),
            outcome = tokio::time::timeout(timeout, exchange) => {
                match outcome {
                    Ok(result) => result?,
                    Err(_) => return Err(ExecutionError::Timeout(timeout.as_secs())),
                }
            }
        };

        tracing::debug!(
            status = record.status.as_u16(),
            negotiated = negotiated_label(record.version),
            bytes = record.raw.len(),
            "Response captured"
        );

        emit_all(self.sink.as_ref(), render::response_block(&record, spec.raw_output));

        Ok(record)
    }
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("defaults", &self.defaults)
            .field("metrics_enabled", &self.metrics_enabled)
            .finish()
    }
}

fn build_request(
    client: &Client,
    prepared: PreparedRequest,
    via_proxy: bool,
    timeout: Duration,
) -> ExecResult<reqwest::Request> {
    let mut builder = client.request(prepared.method, prepared.url);
    for (name, value) in prepared.headers {
        builder = builder.header(name, value);
    }
    if let Some(body) = prepared.body {
        builder = builder.body(body);
    }
    builder
        .build()
        .map_err(|e| ExecutionError::from_transport(&e, via_proxy, timeout))
}

/// Send and read the whole body. A failure after the headers arrived is a
/// failure of the whole call.
async fn exchange(
    client: &Client,
    request: reqwest::Request,
    via_proxy: bool,
    timeout: Duration,
) -> ExecResult<ResponseRecord> {
    let response = client
        .execute(request)
        .await
        .map_err(|e| ExecutionError::from_transport(&e, via_proxy, timeout))?;

    let status = response.status();
    if via_proxy && status == StatusCode::PROXY_AUTHENTICATION_REQUIRED {
        return Err(ExecutionError::ProxyAuthFailed(format!("proxy answered {}", status)));
    }

    let version = response.version();
    let headers = response.headers().clone();
    tracing::debug!(status = status.as_u16(), "Response headers received");

    let raw = response.bytes().await.map_err(|e| body_read_error(&e, timeout))?;

    Ok(ResponseRecord::capture(status, version, headers, raw.to_vec()))
}

/// reqwest reports every body stream failure as a decode error; once the
/// headers are in, anything short of a timeout is a broken connection.
fn body_read_error(err: &reqwest::Error, timeout: Duration) -> ExecutionError {
    if err.is_timeout() {
        ExecutionError::Timeout(timeout.as_secs())
    } else {
        ExecutionError::Network(format!("body read failed: {}", error_chain(err)))
    }
}
