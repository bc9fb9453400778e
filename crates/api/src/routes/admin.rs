//! Staff and administrator views across all organizations.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;

use midyear_core::report::ReportStatus;
use midyear_db::{ReportRepository, repositories::ReportListFilter};
use midyear_shared::types::{PageRequest, PageResponse};

use super::errors::{bad_request, forbidden, map_report_error};
use crate::{AppState, middleware::AuthUser};

/// Creates the admin routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/admin/reports", get(list_reports))
}

/// Query parameters for listing reports.
#[derive(Debug, Default, Deserialize)]
pub struct ListReportsQuery {
    /// Filter by status (`not_started`, `draft`, `submitted`, `reopened`).
    pub status: Option<String>,
    /// Page number, starting at 1.
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
    /// Include reports of every period instead of only the active one.
    #[serde(default)]
    pub all_periods: bool,
}

impl ListReportsQuery {
    fn page_request(&self) -> PageRequest {
        let default = PageRequest::default();
        PageRequest {
            page: self.page.unwrap_or(default.page),
            per_page: self.per_page.unwrap_or(default.per_page),
        }
        .clamped()
    }
}

/// GET `/admin/reports` - List reports with status filter and pagination.
async fn list_reports(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListReportsQuery>,
) -> Response {
    if !auth.role().sees_all_organizations() {
        return forbidden("Staff or administrator role required");
    }

    let status = match query.status.as_deref() {
        None | Some("") => None,
        Some(raw) => match ReportStatus::parse(raw) {
            Some(status) => Some(status),
            None => {
                return bad_request(format!(
                    "Invalid status '{raw}'. Must be one of: not_started, draft, submitted, reopened"
                ));
            }
        },
    };

    let filter = ReportListFilter {
        status,
        period: (!query.all_periods).then_some(state.reporting_period),
    };
    let page = query.page_request();

    let repo = ReportRepository::new((*state.db).clone());
    match repo.list(&filter, &page).await {
        Ok((items, total)) => (
            StatusCode::OK,
            Json(PageResponse::new(items, page.page, page.per_page, total)),
        )
            .into_response(),
        Err(e) => map_report_error(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{request, test_state, token};
    use midyear_shared::UserRole;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_org_user_cannot_list_reports() {
        let state = test_state();
        let token = token(&state, Some(Uuid::new_v4()), UserRole::OrgUser);
        let (status, body) = request(&state, "GET", "/admin/reports", Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn test_unknown_status_is_bad_request() {
        let state = test_state();
        let token = token(&state, None, UserRole::Staff);
        let (status, body) = request(
            &state,
            "GET",
            "/admin/reports?status=archived&page=2",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[test]
    fn test_page_request_defaults_and_clamps() {
        let query = ListReportsQuery::default();
        let page = query.page_request();
        assert_eq!((page.page, page.per_page), (1, 20));

        let query = ListReportsQuery {
            page: Some(0),
            per_page: Some(10_000),
            ..Default::default()
        };
        let page = query.page_request();
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, midyear_shared::types::pagination::MAX_PER_PAGE);
    }
}
