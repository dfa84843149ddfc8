//! Per-call trace subsystem.
//!
//! # Data Flow
//! ```text
//! executor
//!     → render.rs (RequestSpec / ResponseRecord → Vec<TraceEvent>)
//!     → sink.rs (TraceSink::emit, one event at a time)
//!     → NoopSink | TracingSink | WriterSink | CollectingSink
//! ```
//!
//! # Design Decisions
//! - Rendering is pure; emission is the only side effect
//! - A sink error is logged and dropped, never returned to the caller
//! - Each line carries a category so sinks can style without parsing text

pub mod event;
pub mod render;
pub mod sink;

pub use event::{TraceCategory, TraceEvent};
pub use render::hex_dump;
pub use sink::{CollectingSink, NoopSink, TraceError, TraceSink, TracingSink, WriterSink};
