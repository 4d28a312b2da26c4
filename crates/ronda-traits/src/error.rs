//! Error types for the ronda engine.
//!
//! Data insufficiency (too few surprises, a missing EPS estimate, an empty
//! revision bucket) is never an error in ronda: it surfaces as `None` on the
//! affected sub-score. The variants here cover configuration mistakes and
//! collaborator-side failures that a batch caller should see and skip.

use thiserror::Error;

/// The main error type for ronda operations.
#[derive(Debug, Error)]
pub enum RondaError {
    /// Error due to invalid or malformed input values.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Engine configuration rejected at construction time.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Error fetching data from an external provider (transport level).
    #[error("Data fetch error: {0}")]
    DataFetch(String),

    /// A provider answered, but the body could not be understood at all.
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    /// Filesystem error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for ronda operations.
pub type Result<T> = std::result::Result<T, RondaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RondaError::Config("window must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: window must be positive"
        );

        let err = RondaError::MalformedResponse("expected array".to_string());
        assert_eq!(err.to_string(), "Malformed provider response: expected array");
    }

    #[test]
    fn test_error_from_io() {
        let err: RondaError = std::io::Error::from(std::io::ErrorKind::PermissionDenied).into();
        assert!(matches!(err, RondaError::Io(_)));
    }

    #[test]
    fn test_error_from_json() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json");
        let err: RondaError = parse.unwrap_err().into();
        assert!(matches!(err, RondaError::Json(_)));
    }
}
