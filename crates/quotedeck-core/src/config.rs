//! Secrets and tunables sourced from the environment.
//!
//! Keys are read once at startup and never logged. A missing market-data
//! key is fatal for any fetch path; the analysis key is only required by
//! the analysis path.

use crate::error::ConfigError;

pub const POLYGON_API_KEY_VAR: &str = "QUOTEDECK_POLYGON_API_KEY";
pub const OPENAI_API_KEY_VAR: &str = "QUOTEDECK_OPENAI_API_KEY";

/// External secrets collaborator.
#[derive(Debug, Clone)]
pub struct Secrets {
    polygon_api_key: String,
    openai_api_key: Option<String>,
}

impl Secrets {
    /// Read secrets from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            polygon_api_key: require_var(POLYGON_API_KEY_VAR)?,
            openai_api_key: optional_var(OPENAI_API_KEY_VAR),
        })
    }

    /// Explicit values, for tests and embedding applications.
    pub fn new(polygon_api_key: impl Into<String>, openai_api_key: Option<String>) -> Self {
        Self {
            polygon_api_key: polygon_api_key.into(),
            openai_api_key,
        }
    }

    pub fn polygon_api_key(&self) -> &str {
        &self.polygon_api_key
    }

    /// The analysis key, or the fatal startup error for paths that need it.
    pub fn require_openai_api_key(&self) -> Result<&str, ConfigError> {
        self.openai_api_key
            .as_deref()
            .ok_or(ConfigError::MissingKey {
                name: OPENAI_API_KEY_VAR,
            })
    }
}

fn require_var(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if value.trim().is_empty() => Err(ConfigError::EmptyKey { name }),
        Ok(value) => Ok(value),
        Err(_) => Err(ConfigError::MissingKey { name }),
    }
}

fn optional_var(name: &'static str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}
