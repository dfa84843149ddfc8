//! Single-shot configurable HTTP request executor.
//!
//! Given a URL, method, body, headers, cookies, timeout, optional proxy and
//! a protocol version ceiling, performs exactly one request/response cycle
//! and returns the decoded body, reporting each stage to a trace sink.

pub mod config;
pub mod executor;
pub mod lifecycle;
pub mod observability;
pub mod request;
pub mod trace;

pub use config::ExecutorConfig;
pub use executor::{ErrorKind, ExecutionError, RequestExecutor};
pub use request::{ProtocolVersion, ProxyDescriptor, RequestSpec};
pub use trace::{TraceEvent, TraceSink};
