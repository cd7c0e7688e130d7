//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error (malformed input row or missing field).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A required resource (e.g. the category mapping table) could not be read.
    #[error("Resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// A multi-store write failed after some rows were already persisted.
    #[error("Partial write: {0}")]
    PartialWrite(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::ResourceUnavailable(_) => 503,
            Self::PartialWrite(_) | Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::ResourceUnavailable(_) => "RESOURCE_UNAVAILABLE",
            Self::PartialWrite(_) => "PARTIAL_WRITE",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the caller should assume rows were left behind by the failure.
    #[must_use]
    pub const fn may_have_partial_state(&self) -> bool {
        matches!(self, Self::PartialWrite(_))
    }
}
