//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! executor produces:
//!     → tracing spans/events (call_id, stage transitions, failures)
//!     → metrics.rs (counters, histogram)
//!     → trace sink (per-call request/response lines, see crate::trace)
//!
//! Consumers:
//!     → logging.rs subscriber (stderr)
//!     → whatever metrics recorder the host installs
//! ```

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
