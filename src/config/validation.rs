//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeout > 0, bounded redirects)
//! - Check that header-bound strings are valid header values
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ExecutorConfig → Result<(), Vec<ValidationError>>

use std::fmt;

use reqwest::header::HeaderValue;

use crate::config::schema::ExecutorConfig;

const MAX_REDIRECTS_LIMIT: usize = 50;
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub fn validate_config(config: &ExecutorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let defaults = &config.defaults;

    if defaults.timeout_secs == 0 {
        errors.push(ValidationError::new("defaults.timeout_secs", "must be greater than 0"));
    }

    if defaults.max_redirects > MAX_REDIRECTS_LIMIT {
        errors.push(ValidationError::new(
            "defaults.max_redirects",
            format!("must be at most {}", MAX_REDIRECTS_LIMIT),
        ));
    }

    if HeaderValue::from_str(&defaults.content_type).is_err() || defaults.content_type.is_empty() {
        errors.push(ValidationError::new(
            "defaults.content_type",
            format!("'{}' is not a valid header value", defaults.content_type),
        ));
    }

    if let Some(user_agent) = &defaults.user_agent {
        if HeaderValue::from_str(user_agent).is_err() {
            errors.push(ValidationError::new("defaults.user_agent", "not a valid header value"));
        }
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
