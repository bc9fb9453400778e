//! Application routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use midyear_core::report::{CallType, ReportTemplate};
use midyear_db::{ApplicationRepository, repositories::ApplicationWithOrganization};

use super::errors::{forbidden, internal_error, not_found};
use crate::{AppState, middleware::AuthUser};

/// Creates the application routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/applications", get(list_applications))
        .route("/applications/{application_id}", get(get_application))
}

/// Response for an application.
#[derive(Debug, Serialize)]
pub struct ApplicationResponse {
    /// Application ID.
    pub id: Uuid,
    /// Application title.
    pub title: String,
    /// Call the application was funded under.
    pub call_type: CallType,
    /// Report form used for this call.
    pub template: ReportTemplate,
    /// Owning organization ID.
    pub organization_id: Uuid,
    /// Owning organization name.
    pub organization_name: Option<String>,
    /// Funding stream.
    pub funding_stream: Option<String>,
    /// Total amount awarded.
    pub total_awarded: Option<Decimal>,
    /// Application year.
    pub application_year: Option<i32>,
}

impl From<ApplicationWithOrganization> for ApplicationResponse {
    fn from(row: ApplicationWithOrganization) -> Self {
        let call_type = CallType::from(row.application.call_type);
        Self {
            id: row.application.id,
            title: row.application.title,
            call_type,
            template: call_type.template(),
            organization_id: row.application.organization_id,
            organization_name: row.organization.map(|o| o.name),
            funding_stream: row.application.funding_stream,
            total_awarded: row.application.total_awarded,
            application_year: row.application.application_year,
        }
    }
}

/// What the caller intends to do with an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Access {
    Read,
    Edit,
}

/// Loads an application and checks the caller's access to it.
///
/// Applications of other organizations answer 404 so their existence is not revealed.
pub(crate) async fn authorize_application(
    state: &AppState,
    auth: &AuthUser,
    application_id: Uuid,
    access: Access,
) -> Result<ApplicationWithOrganization, Response> {
    let repo = ApplicationRepository::new((*state.db).clone());

    let row = match repo.find_with_organization(application_id).await {
        Ok(Some(row)) => row,
        Ok(None) => return Err(not_found("Application not found")),
        Err(e) => return Err(internal_error("Failed to load application", &e)),
    };

    let org_id = row.application.organization_id;
    if !auth.claims().can_access_organization(org_id) {
        return Err(not_found("Application not found"));
    }
    if access == Access::Edit && !auth.claims().can_edit_for_organization(org_id) {
        return Err(forbidden("You may not edit reports for this application"));
    }

    Ok(row)
}

/// GET `/applications` - List the applications visible to the caller.
async fn list_applications(State(state): State<AppState>, auth: AuthUser) -> Response {
    let scope = if auth.role().sees_all_organizations() {
        None
    } else {
        match auth.organization_id() {
            Some(org_id) => Some(org_id),
            None => return forbidden("Your account is not linked to an organization"),
        }
    };

    let repo = ApplicationRepository::new((*state.db).clone());
    match repo.list(scope).await {
        Ok(rows) => {
            let applications: Vec<ApplicationResponse> =
                rows.into_iter().map(ApplicationResponse::from).collect();
            (
                StatusCode::OK,
                Json(json!({ "applications": applications })),
            )
                .into_response()
        }
        Err(e) => internal_error("Failed to list applications", &e),
    }
}

/// GET `/applications/{application_id}` - Get one application.
async fn get_application(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(application_id): Path<Uuid>,
) -> Response {
    match authorize_application(&state, &auth, application_id, Access::Read).await {
        Ok(row) => (StatusCode::OK, Json(ApplicationResponse::from(row))).into_response(),
        Err(response) => response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{request, test_state, token};
    use midyear_shared::UserRole;

    #[tokio::test]
    async fn test_list_applications_requires_token() {
        let state = test_state();
        let response = request(&state, "GET", "/applications", None, None).await;
        assert_eq!(response.0, StatusCode::UNAUTHORIZED);
        assert_eq!(response.1["error"], "MISSING_TOKEN");
    }

    #[tokio::test]
    async fn test_org_user_without_organization_is_forbidden() {
        let state = test_state();
        let token = token(&state, None, UserRole::OrgUser);
        let response = request(&state, "GET", "/applications", Some(&token), None).await;
        assert_eq!(response.0, StatusCode::FORBIDDEN);
        assert_eq!(response.1["error"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn test_invalid_token_is_rejected() {
        let state = test_state();
        let response = request(&state, "GET", "/applications", Some("not-a-jwt"), None).await;
        assert_eq!(response.0, StatusCode::UNAUTHORIZED);
        assert_eq!(response.1["error"], "INVALID_TOKEN");

        let path = format!("/applications/{}", Uuid::new_v4());
        let response = request(&state, "GET", &path, None, None).await;
        assert_eq!(response.0, StatusCode::UNAUTHORIZED);
    }
}
