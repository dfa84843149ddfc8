//! Configuration and request file loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::ExecutorConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::request::spec::RequestSpec;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Json(serde_json::Error),
    UnsupportedFormat(String),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Json(e) => write!(f, "JSON error: {}", e),
            ConfigError::UnsupportedFormat(ext) => {
                write!(f, "Unsupported file format '{}' (expected .toml or .json)", ext)
            }
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ExecutorConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ExecutorConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load a request description from a `.toml` or `.json` file.
pub fn load_request_spec(path: &Path) -> Result<RequestSpec, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(ConfigError::Parse),
        Some("json") => serde_json::from_str(&content).map_err(ConfigError::Json),
        other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string())),
    }
}
