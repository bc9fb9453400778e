//! Report error types.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::report::submission::SubmissionErrors;
use crate::report::types::ReportStatus;

/// Errors that can occur during report lifecycle operations.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The report is submitted and cannot be edited.
    #[error("Report has been submitted and can no longer be edited")]
    ReportLocked,

    /// The report was already submitted.
    #[error("Report has already been submitted")]
    AlreadySubmitted,

    /// Reopen was requested for a report that is not submitted.
    #[error("Only submitted reports can be reopened (current status: {status})")]
    NotSubmitted {
        /// The current status.
        status: ReportStatus,
    },

    /// The user's role does not allow the operation.
    #[error("Only administrators can reopen reports")]
    Forbidden,

    /// A stored report's status and submission timestamp disagree.
    #[error("Report status {status} is inconsistent with submitted_at {submitted_at:?}")]
    Inconsistent {
        /// Stored status.
        status: ReportStatus,
        /// Stored submission timestamp.
        submitted_at: Option<DateTime<Utc>>,
    },

    /// The report content does not satisfy the submission rules.
    #[error("Report is not ready for submission")]
    ValidationFailed(SubmissionErrors),
}

impl ReportError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ReportLocked | Self::AlreadySubmitted | Self::NotSubmitted { .. } => 409,
            Self::Forbidden => 403,
            Self::ValidationFailed(_) => 422,
            Self::Inconsistent { .. } => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ReportLocked => "REPORT_LOCKED",
            Self::AlreadySubmitted => "ALREADY_SUBMITTED",
            Self::NotSubmitted { .. } => "NOT_SUBMITTED",
            Self::Forbidden => "FORBIDDEN",
            Self::Inconsistent { .. } => "REPORT_INCONSISTENT",
            Self::ValidationFailed(_) => "SUBMISSION_INVALID",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_locked_error() {
        let err = ReportError::ReportLocked;
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.error_code(), "REPORT_LOCKED");
    }

    #[test]
    fn test_not_submitted_mentions_status() {
        let err = ReportError::NotSubmitted {
            status: ReportStatus::Draft,
        };
        assert_eq!(err.status_code(), 409);
        assert!(err.to_string().contains("draft"));
    }

    #[test]
    fn test_forbidden_error() {
        let err = ReportError::Forbidden;
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.error_code(), "FORBIDDEN");
    }

    #[test]
    fn test_inconsistent_is_server_error() {
        let err = ReportError::Inconsistent {
            status: ReportStatus::Submitted,
            submitted_at: None,
        };
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_validation_failed_error() {
        let err = ReportError::ValidationFailed(SubmissionErrors::default());
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.error_code(), "SUBMISSION_INVALID");
    }
}
