//! Metrics collection.
//!
//! # Metrics
//! - `http_exec_requests_total` (counter): completed calls by method, status
//! - `http_exec_failures_total` (counter): failed calls by method, error kind
//! - `http_exec_request_duration_seconds` (histogram): wall time per call
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; the embedding application
//!   installs the recorder/exporter, otherwise updates are no-ops

use std::time::Instant;

use metrics::{counter, histogram};

use crate::executor::error::ErrorKind;

pub fn record_success(method: &str, status: u16, start: Instant) {
    counter!(
        "http_exec_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    record_duration(method, start);
}

pub fn record_failure(method: &str, kind: ErrorKind, start: Instant) {
    counter!(
        "http_exec_failures_total",
        "method" => method.to_string(),
        "kind" => kind.as_str()
    )
    .increment(1);
    record_duration(method, start);
}

fn record_duration(method: &str, start: Instant) {
    histogram!("http_exec_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}
