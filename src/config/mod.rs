//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ExecutorConfig (validated, immutable)
//!     → RequestExecutor::from_config, CLI sink/log setup
//!
//! request file (TOML or JSON)
//!     → loader.rs → RequestSpec
//! ```
//!
//! # Design Decisions
//! - Config is read once per process; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_request_spec, ConfigError};
pub use schema::{DefaultsConfig, ExecutorConfig, ObservabilityConfig, SinkKind, TraceConfig};
