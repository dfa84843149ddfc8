//! Call lifecycle management.
//!
//! # Data Flow
//! ```text
//! Cancellation (owner, e.g. Ctrl-C handler)
//!     → CancelToken (cloned into each call)
//!     → executor selects on token vs. send/receive stage
//!     → Cancelled error, in-flight transport dropped
//! ```
//!
//! # Design Decisions
//! - Cancellation is optional; the timeout alone bounds every call
//! - A dropped coordinator never cancels its tokens

pub mod cancel;

pub use cancel::{CancelToken, Cancellation};
