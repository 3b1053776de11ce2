//! Model gateway errors

use std::time::Duration;
use thiserror::Error;

/// Ways a completion call can fail
#[derive(Debug, Error)]
pub enum LlmError {
    /// The API returned 429; carries the server's retry-after hint
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    /// Whether an immediate backoff-and-retry is safe.
    ///
    /// Rate limits are excluded: they carry a server-provided wait and are
    /// returned to the caller rather than burning retry attempts.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::ApiError { status, .. } => *status == 408 || *status >= 500,
            LlmError::Network(_) | LlmError::Timeout(_) => true,
            LlmError::RateLimited { .. } | LlmError::InvalidResponse(_) | LlmError::Json(_) => false,
        }
    }

    /// Server-suggested wait, when the failure was a rate limit
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            LlmError::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_side_statuses_are_retryable() {
        for status in [408, 500, 502, 503, 504, 529] {
            let err = LlmError::ApiError {
                status,
                message: "transient".to_string(),
            };
            assert!(err.is_retryable(), "status {} should be retryable", status);
        }
    }

    #[test]
    fn test_client_side_statuses_are_final() {
        for status in [400, 401, 403, 404] {
            let err = LlmError::ApiError {
                status,
                message: "caller mistake".to_string(),
            };
            assert!(!err.is_retryable(), "status {} should not be retried", status);
        }
    }

    #[test]
    fn test_rate_limit_is_not_retried_by_transport() {
        let err = LlmError::RateLimited {
            retry_after: Duration::from_secs(60),
        };
        assert!(!err.is_retryable());
        assert_eq!(err.retry_after(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_timeout_is_retryable() {
        assert!(LlmError::Timeout(Duration::from_secs(30)).is_retryable());
    }

    #[test]
    fn test_parse_failures_are_final() {
        let err = LlmError::InvalidResponse("no text blocks".to_string());
        assert!(!err.is_retryable());
        assert_eq!(err.retry_after(), None);
    }
}
