//! Result and error types for the core library

use thiserror::Error;

/// Core library error type
///
/// Services return `anyhow::Result` at their boundaries; this type carries
/// the structured failure underneath so callers can still match on the kind.
#[derive(Error, Debug)]
pub enum Error {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("recognition error: {0}")]
    Recognition(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a not found error
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a recognition error
    pub fn recognition(msg: impl Into<String>) -> Self {
        Self::Recognition(msg.into())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_kind_and_message() {
        assert_eq!(
            Error::validation("quantity cannot be negative").to_string(),
            "validation error: quantity cannot be negative"
        );
        assert_eq!(
            Error::not_found("recipe").to_string(),
            "not found: recipe"
        );
    }

    #[test]
    fn test_json_errors_convert() {
        let bad: Result<Vec<String>> =
            serde_json::from_str("not json").map_err(Error::from);
        assert!(matches!(bad, Err(Error::Json(_))));
    }
}
