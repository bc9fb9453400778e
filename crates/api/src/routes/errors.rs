//! Error-to-response mapping shared by the route handlers.

use std::fmt::Display;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use midyear_core::report::ReportError;
use midyear_db::ReportRepositoryError;
use midyear_shared::AppError;

/// Renders an [`AppError`] as `{ "error": code, "message": text }`.
pub fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.message()
        })),
    )
        .into_response()
}

/// Logs an unexpected failure and returns a generic 500.
pub fn internal_error(context: &str, e: &dyn Display) -> Response {
    error!(error = %e, "{context}");
    error_response(&AppError::Internal("An error occurred".to_string()))
}

/// 400 with a validation message.
pub fn bad_request(message: impl Into<String>) -> Response {
    error_response(&AppError::Validation(message.into()))
}

/// 403 with a message.
pub fn forbidden(message: impl Into<String>) -> Response {
    error_response(&AppError::Forbidden(message.into()))
}

/// 404 with a message.
pub fn not_found(message: impl Into<String>) -> Response {
    error_response(&AppError::NotFound(message.into()))
}

/// Maps report repository errors to HTTP responses.
pub fn map_report_error(e: &ReportRepositoryError) -> Response {
    match e {
        ReportRepositoryError::ApplicationNotFound(_) | ReportRepositoryError::ReportNotFound(_) => {
            not_found(e.to_string())
        }
        ReportRepositoryError::DuplicateAllocationType(_) => bad_request(e.to_string()),
        ReportRepositoryError::Report(ReportError::ValidationFailed(errors)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "SUBMISSION_INVALID",
                "message": "Please correct the following errors before submitting",
                "details": errors
            })),
        )
            .into_response(),
        ReportRepositoryError::Report(report_error) => {
            if report_error.status_code() >= 500 {
                return internal_error("Report integrity error", report_error);
            }
            let status = StatusCode::from_u16(report_error.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (
                status,
                Json(json!({
                    "error": report_error.error_code(),
                    "message": report_error.to_string()
                })),
            )
                .into_response()
        }
        ReportRepositoryError::Period(_) | ReportRepositoryError::Database(_) => {
            internal_error("Report operation failed", e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use midyear_core::report::{ReportStatus, SubmissionErrors, SubmissionSection};
    use uuid::Uuid;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_report_locked_maps_to_conflict() {
        let response = map_report_error(&ReportError::ReportLocked.into());
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await["error"], "REPORT_LOCKED");
    }

    #[tokio::test]
    async fn test_validation_failed_carries_details() {
        let mut errors = SubmissionErrors::default();
        errors.push(SubmissionSection::Narratives, "Progress narrative is required");
        let response = map_report_error(&ReportError::ValidationFailed(errors).into());

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(
            body["details"]["narratives"][0],
            "Progress narrative is required"
        );
    }

    #[tokio::test]
    async fn test_not_found_and_forbidden() {
        let response = map_report_error(&ReportRepositoryError::ReportNotFound(Uuid::nil()));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = map_report_error(&ReportError::Forbidden.into());
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_inconsistent_row_is_internal_error() {
        let response = map_report_error(
            &ReportError::Inconsistent {
                status: ReportStatus::Submitted,
                submitted_at: None,
            }
            .into(),
        );
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "INTERNAL_ERROR");
    }
}
