//! Request execution subsystem.
//!
//! # Data Flow
//! ```text
//! RequestSpec + Option<ProxyDescriptor>
//!     → request::assemble (validate, InvalidRequest on failure)
//!     → transport.rs (per-call reqwest::Client: ceiling, redirects, timeout, proxy)
//!     → dispatch.rs (request trace → send once → capture → response trace)
//!     → decoded text | ExecutionError (error.rs)
//! ```
//!
//! # Design Decisions
//! - Single-shot: no pooling, retries or session state between calls
//! - Every failure maps to one ErrorKind; transport errors are classified
//!   by walking their source chain
//! - Concurrent calls share nothing but the (thread-safe) trace sink

pub mod dispatch;
pub mod error;
pub mod transport;

pub use dispatch::{RequestExecutor, ResponseRecord};
pub use error::{ErrorKind, ExecResult, ExecutionError};
