//! Error types for Markflow

use thiserror::Error;

/// Main error type for Markflow
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Upstream fetch failed ({status}): {message}")]
    Fetch { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Markflow
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Config(_) => 500,
            Error::Database(_) => 500,
            Error::Storage(_) => 500,
            Error::InvalidInput(_) => 400,
            Error::Fetch { .. } => 502,
            Error::Parse(_) => 500,
            Error::Generation(_) => 502,
            Error::NotFound(_) => 404,
            Error::Internal(_) => 500,
            Error::Other(_) => 500,
        }
    }

    /// Returns the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Error::Config(_) => "CONFIG_ERROR",
            Error::Database(_) => "DATABASE_ERROR",
            Error::Storage(_) => "STORAGE_ERROR",
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::Fetch { .. } => "FETCH_ERROR",
            Error::Parse(_) => "PARSE_ERROR",
            Error::Generation(_) => "GENERATION_ERROR",
            Error::NotFound(_) => "NOT_FOUND",
            Error::Internal(_) => "INTERNAL_ERROR",
            Error::Other(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::InvalidInput("url".into()).status_code(), 400);
        assert_eq!(
            Error::Fetch {
                status: 403,
                message: "Forbidden".into()
            }
            .status_code(),
            502
        );
        assert_eq!(Error::NotFound("template".into()).status_code(), 404);
        assert_eq!(Error::Parse("bad html".into()).status_code(), 500);
    }

    #[test]
    fn test_fetch_error_carries_upstream_status() {
        let err = Error::Fetch {
            status: 404,
            message: "Not Found".into(),
        };
        assert_eq!(err.to_string(), "Upstream fetch failed (404): Not Found");
        assert_eq!(err.code(), "FETCH_ERROR");
    }
}
