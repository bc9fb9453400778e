//! Error categories shared by every HTTP-facing crate.
//!
//! Domain errors keep their own enums; handlers fold them into an [`AppError`]
//! when they have nothing more specific to say.

use thiserror::Error;

/// Request-level error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// No valid identity on the request.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Identity is valid but may not act on the resource.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Resource not found, or not visible to the caller.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed request input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unexpected failure. The message is safe to show; details go to the log.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code for this category.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::Internal(_) => 500,
        }
    }

    /// Stable code for the `error` field of API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// The message without the category prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Unauthorized(m)
            | Self::Forbidden(m)
            | Self::NotFound(m)
            | Self::Validation(m)
            | Self::Internal(m) => m,
        }
    }
}
