use thiserror::Error;

/// Validation and contract errors exposed by `quotedeck-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },
}

/// Failure taxonomy for one fetch orchestration.
///
/// `RateLimited` and `Transport` are retryable and stay inside the retry
/// loop; `MalformedResponse` and `Exhausted` surface to the caller.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Provider signalled throttling (HTTP 429).
    #[error("provider rate limited the request (HTTP 429)")]
    RateLimited,

    /// Network failure or a non-OK status that is not a throttle signal.
    #[error("transport failure: {message}")]
    Transport {
        message: String,
        status: Option<u16>,
    },

    /// Response body was structurally unusable (not parseable at all).
    ///
    /// Missing or malformed *fields* inside an otherwise well-formed body
    /// never produce this error; they degrade to zero defaults instead.
    #[error("provider returned an unusable payload: {message}")]
    MalformedResponse { message: String },

    /// Retry budget spent. Terminal for this orchestration.
    #[error("retry budget exhausted after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: Box<FetchError>,
    },
}

impl FetchError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            status: None,
        }
    }

    pub fn status(status: u16) -> Self {
        if status == 429 {
            Self::RateLimited
        } else {
            Self::Transport {
                message: format!("provider returned status {status}"),
                status: Some(status),
            }
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Whether the retry loop may attempt this call again.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::Transport { .. })
    }
}

/// Startup configuration errors.
///
/// A missing secret is fatal for any code path that needs it; there is no
/// degraded mode for an unauthenticated provider call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable '{name}'")]
    MissingKey { name: &'static str },
    #[error("environment variable '{name}' is set but empty")]
    EmptyKey { name: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_429_as_rate_limited() {
        assert!(matches!(FetchError::status(429), FetchError::RateLimited));
        assert!(matches!(
            FetchError::status(500),
            FetchError::Transport {
                status: Some(500),
                ..
            }
        ));
    }

    #[test]
    fn retryable_covers_throttle_and_transport_only() {
        assert!(FetchError::RateLimited.is_retryable());
        assert!(FetchError::transport("connection reset").is_retryable());
        assert!(!FetchError::malformed("not json").is_retryable());
        assert!(!FetchError::Exhausted {
            attempts: 4,
            last: Box::new(FetchError::RateLimited),
        }
        .is_retryable());
    }
}
