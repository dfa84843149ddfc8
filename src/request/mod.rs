//! Request description subsystem.
//!
//! # Data Flow
//! ```text
//! caller inputs (strings, ordered maps)
//!     → spec.rs (RequestSpec, defaults, cookie synthesis)
//!     → version.rs (version string → ProtocolVersion ceiling)
//!     → assemble.rs (validated PreparedRequest or InvalidRequest)
//!     → executor
//!
//! proxy.rs: optional ProxyDescriptor, read-only for the executor
//! ```
//!
//! # Design Decisions
//! - Validation happens at this boundary, not deferred to the transport
//! - Header and cookie maps keep insertion order; duplicate keys overwrite
//! - No identity beyond a single call: every type here is plain data

pub mod assemble;
pub mod pairs;
pub mod proxy;
pub mod spec;
pub mod version;

pub use assemble::PreparedRequest;
pub use pairs::OrderedPairs;
pub use proxy::{ProxyCredentials, ProxyDescriptor, ProxyKind};
pub use spec::{RequestSpec, DEFAULT_CONTENT_TYPE, DEFAULT_TIMEOUT_SECS};
pub use version::ProtocolVersion;
