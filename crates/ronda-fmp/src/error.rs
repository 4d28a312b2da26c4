//! Error types for FMP API client.

use ronda_traits::RondaError;
use thiserror::Error;

/// Errors that can occur when using the FMP API.
#[derive(Debug, Error)]
pub enum FmpError {
    /// Missing API key.
    #[error("FMP_API_KEY environment variable not set")]
    MissingApiKey,

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned an error.
    #[error("FMP API error: {0}")]
    Api(String),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded. Free tier allows 250 requests/day.")]
    RateLimitExceeded,

    /// Environment variable error.
    #[error("Environment error: {0}")]
    Env(#[from] dotenvy::Error),
}

impl From<FmpError> for RondaError {
    fn from(err: FmpError) -> Self {
        match err {
            FmpError::MissingApiKey | FmpError::Env(_) => Self::Config(err.to_string()),
            FmpError::Json(_) => Self::MalformedResponse(err.to_string()),
            FmpError::Request(_) | FmpError::Api(_) | FmpError::RateLimitExceeded => {
                Self::DataFetch(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_ronda_error() {
        assert!(matches!(
            RondaError::from(FmpError::RateLimitExceeded),
            RondaError::DataFetch(_)
        ));
        assert!(matches!(RondaError::from(FmpError::MissingApiKey), RondaError::Config(_)));

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(
            RondaError::from(FmpError::from(json_err)),
            RondaError::MalformedResponse(_)
        ));
    }
}
