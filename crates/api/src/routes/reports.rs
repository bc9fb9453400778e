//! Mid-year report routes for a single application.
//!
//! Reports are addressed through their application and always refer to the
//! active reporting period configured for the server.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use midyear_core::{
    allocation::{AllocationCheck, AllocationSet, AllocationValidator, MAX_AMOUNT, amount_error},
    financial::FinancialSummary,
    period::ReportingPeriod,
    report::{CallType, ReportStatus, ReportTemplate},
};
use midyear_db::{
    AllocationRepository, ApplicationRepository, ReportRepository,
    entities::application_reports,
    repositories::{
        ApplicationWithOrganization, NonProjectAllocationInput, ProjectAllocationInput,
        SaveReportInput, StoredAllocations,
    },
};
use midyear_shared::types::Usd;

use super::{
    applications::{Access, ApplicationResponse, authorize_application},
    errors::{bad_request, forbidden, internal_error, map_report_error, not_found},
};
use crate::{AppState, middleware::AuthUser};

/// Creates the report routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/applications/{application_id}/report", get(get_report))
        .route("/applications/{application_id}/report", put(save_report))
        .route(
            "/applications/{application_id}/report/project-allocations",
            put(replace_project_allocations),
        )
        .route(
            "/applications/{application_id}/report/non-project-allocations",
            put(replace_non_project_allocations),
        )
        .route(
            "/applications/{application_id}/report/allocation-summary",
            get(get_allocation_summary),
        )
        .route(
            "/applications/{application_id}/report/submit",
            post(submit_report),
        )
        .route(
            "/applications/{application_id}/report/reopen",
            post(reopen_report),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for saving report content.
#[derive(Debug, Deserialize)]
pub struct SaveReportRequest {
    /// Progress narrative.
    pub progress_narrative: Option<String>,
    /// Variance narrative.
    pub variance_narrative: Option<String>,
    /// Financial summary narrative.
    pub financial_summary_narrative: Option<String>,
    /// Funds spent so far in the period.
    pub current_funds_spent: Option<Decimal>,
}

/// Request body replacing the project allocations of a report.
#[derive(Debug, Deserialize)]
pub struct ProjectAllocationsRequest {
    /// The full new set of project allocations.
    pub allocations: Vec<ProjectAllocationInput>,
}

/// Request body replacing the non-project allocations of a report.
#[derive(Debug, Deserialize)]
pub struct NonProjectAllocationsRequest {
    /// The full new set of non-project allocations.
    pub allocations: Vec<NonProjectAllocationInput>,
}

/// A reporting period with its display label.
#[derive(Debug, Serialize)]
pub struct PeriodResponse {
    /// First day of the period.
    pub start: NaiveDate,
    /// Last day of the period.
    pub end: NaiveDate,
    /// Label such as "January 1 - June 30, 2025".
    pub label: String,
}

impl From<ReportingPeriod> for PeriodResponse {
    fn from(period: ReportingPeriod) -> Self {
        Self {
            start: period.start(),
            end: period.end(),
            label: period.label(),
        }
    }
}

/// Everything a client needs to render and edit a report.
#[derive(Debug, Serialize)]
pub struct ReportView {
    /// The stored report.
    pub report: application_reports::Model,
    /// Period the report covers.
    pub period: PeriodResponse,
    /// The application being reported on.
    pub application: ApplicationResponse,
    /// Report form for the application's call.
    pub template: ReportTemplate,
    /// Maximum characters in each narrative.
    pub narrative_limit: usize,
    /// Stored allocations.
    pub allocations: StoredAllocations,
    /// Balance and cap check of the stored allocations.
    pub allocation_check: AllocationCheck,
    /// Funds available, spent and remaining.
    pub financial_summary: FinancialSummary,
    /// True when the caller may change the report now.
    pub editable: bool,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Funds received and prior-year funds for the active period, zero when not recorded.
async fn period_funds(
    state: &AppState,
    application_id: Uuid,
) -> Result<(Decimal, Decimal), Response> {
    let repo = ApplicationRepository::new((*state.db).clone());
    match repo.financials(application_id, state.reporting_period).await {
        Ok(Some(f)) => Ok((f.funds_received, f.funds_prior_year)),
        Ok(None) => Ok((Decimal::ZERO, Decimal::ZERO)),
        Err(e) => Err(internal_error("Failed to load financials", &e)),
    }
}

/// Assembles the full report view.
async fn report_view(
    state: &AppState,
    auth: &AuthUser,
    row: ApplicationWithOrganization,
    report: application_reports::Model,
) -> Result<ReportView, Response> {
    let allocation_repo = AllocationRepository::new((*state.db).clone());
    let allocations = allocation_repo
        .load(report.id)
        .await
        .map_err(|e| internal_error("Failed to load allocations", &e))?;

    let (funds_received, funds_prior_year) = period_funds(state, row.application.id).await?;
    let allocation_check = allocations.check(funds_received);
    let financial_summary = FinancialSummary::compute(
        funds_received,
        funds_prior_year,
        report.current_funds_spent.unwrap_or(Decimal::ZERO),
    );

    let template = CallType::from(row.application.call_type).template();
    let editable = ReportStatus::from(report.status).is_editable()
        && auth
            .claims()
            .can_edit_for_organization(row.application.organization_id);

    Ok(ReportView {
        report,
        period: state.reporting_period.into(),
        application: row.into(),
        template,
        narrative_limit: template.narrative_limit(),
        allocations,
        allocation_check,
        financial_summary,
        editable,
    })
}

/// Returns the active-period report, creating it on first access.
async fn current_report(
    state: &AppState,
    application_id: Uuid,
) -> Result<application_reports::Model, Response> {
    ReportRepository::new((*state.db).clone())
        .get_or_create(application_id, state.reporting_period)
        .await
        .map_err(|e| map_report_error(&e))
}

/// Returns the active-period report if one exists.
async fn existing_report(
    state: &AppState,
    application_id: Uuid,
) -> Result<application_reports::Model, Response> {
    match ReportRepository::new((*state.db).clone())
        .find_for_period(application_id, state.reporting_period)
        .await
    {
        Ok(Some(report)) => Ok(report),
        Ok(None) => Err(not_found("No report exists for the current period")),
        Err(e) => Err(map_report_error(&e)),
    }
}

fn view_response(view: Result<ReportView, Response>) -> Response {
    match view {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(response) => response,
    }
}

/// Rejects amounts a `NUMERIC(15,2)` column cannot hold before they reach the database.
fn check_project_amounts(allocations: &[ProjectAllocationInput]) -> Result<(), Response> {
    for (index, allocation) in allocations.iter().enumerate() {
        let subject = format!("Project allocation {}", index + 1);
        if let Some(message) = amount_error(&subject, allocation.amount) {
            return Err(bad_request(message));
        }
    }
    Ok(())
}

fn check_non_project_amounts(allocations: &[NonProjectAllocationInput]) -> Result<(), Response> {
    for allocation in allocations {
        if let Some(message) = amount_error(allocation.allocation_type.label(), allocation.amount) {
            return Err(bad_request(message));
        }
    }
    Ok(())
}

fn check_funds_spent(spent: Option<Decimal>) -> Result<(), Response> {
    match spent {
        Some(spent) if spent < Decimal::ZERO => {
            Err(bad_request("Current funds spent cannot be negative"))
        }
        Some(spent) if spent > MAX_AMOUNT => Err(bad_request(format!(
            "Current funds spent exceeds the maximum amount of {}",
            Usd(MAX_AMOUNT)
        ))),
        _ => Ok(()),
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/applications/{application_id}/report` - Get (or start) the current report.
async fn get_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(application_id): Path<Uuid>,
) -> Response {
    let row = match authorize_application(&state, &auth, application_id, Access::Read).await {
        Ok(row) => row,
        Err(response) => return response,
    };
    let report = match current_report(&state, application_id).await {
        Ok(report) => report,
        Err(response) => return response,
    };

    view_response(report_view(&state, &auth, row, report).await)
}

/// PUT `/applications/{application_id}/report` - Save narratives and funds spent.
async fn save_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(application_id): Path<Uuid>,
    Json(payload): Json<SaveReportRequest>,
) -> Response {
    if let Err(response) = check_funds_spent(payload.current_funds_spent) {
        return response;
    }

    let row = match authorize_application(&state, &auth, application_id, Access::Edit).await {
        Ok(row) => row,
        Err(response) => return response,
    };
    let report = match current_report(&state, application_id).await {
        Ok(report) => report,
        Err(response) => return response,
    };

    let input = SaveReportInput {
        progress_narrative: payload.progress_narrative,
        variance_narrative: payload.variance_narrative,
        financial_summary_narrative: payload.financial_summary_narrative,
        current_funds_spent: payload.current_funds_spent,
    };

    let repo = ReportRepository::new((*state.db).clone());
    match repo.save_draft(report.id, input).await {
        Ok(saved) => view_response(report_view(&state, &auth, row, saved).await),
        Err(e) => map_report_error(&e),
    }
}

/// PUT `/applications/{application_id}/report/project-allocations` - Replace project allocations.
async fn replace_project_allocations(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(application_id): Path<Uuid>,
    Json(payload): Json<ProjectAllocationsRequest>,
) -> Response {
    if let Err(response) = check_project_amounts(&payload.allocations) {
        return response;
    }

    let row = match authorize_application(&state, &auth, application_id, Access::Edit).await {
        Ok(row) => row,
        Err(response) => return response,
    };
    let report = match current_report(&state, application_id).await {
        Ok(report) => report,
        Err(response) => return response,
    };

    let repo = AllocationRepository::new((*state.db).clone());
    if let Err(e) = repo
        .replace_project_allocations(report.id, payload.allocations)
        .await
    {
        return map_report_error(&e);
    }

    refreshed_view(&state, &auth, row, report.id).await
}

/// PUT `/applications/{application_id}/report/non-project-allocations` - Replace non-project allocations.
async fn replace_non_project_allocations(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(application_id): Path<Uuid>,
    Json(payload): Json<NonProjectAllocationsRequest>,
) -> Response {
    if let Err(response) = check_non_project_amounts(&payload.allocations) {
        return response;
    }

    let row = match authorize_application(&state, &auth, application_id, Access::Edit).await {
        Ok(row) => row,
        Err(response) => return response,
    };
    let report = match current_report(&state, application_id).await {
        Ok(report) => report,
        Err(response) => return response,
    };

    let repo = AllocationRepository::new((*state.db).clone());
    if let Err(e) = repo
        .replace_non_project_allocations(report.id, payload.allocations)
        .await
    {
        return map_report_error(&e);
    }

    refreshed_view(&state, &auth, row, report.id).await
}

/// Re-reads a report after a write and renders its view.
async fn refreshed_view(
    state: &AppState,
    auth: &AuthUser,
    row: ApplicationWithOrganization,
    report_id: Uuid,
) -> Response {
    let repo = ReportRepository::new((*state.db).clone());
    match repo.find_by_id(report_id).await {
        Ok(Some(report)) => view_response(report_view(state, auth, row, report).await),
        Ok(None) => not_found("Report not found"),
        Err(e) => map_report_error(&e),
    }
}

/// GET `/applications/{application_id}/report/allocation-summary` - Check the stored allocations.
///
/// Works before a report exists; the check then runs on an empty set.
async fn get_allocation_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(application_id): Path<Uuid>,
) -> Response {
    if let Err(response) =
        authorize_application(&state, &auth, application_id, Access::Read).await
    {
        return response;
    }

    let (funds_received, _) = match period_funds(&state, application_id).await {
        Ok(funds) => funds,
        Err(response) => return response,
    };

    let repo = ReportRepository::new((*state.db).clone());
    let report = match repo
        .find_for_period(application_id, state.reporting_period)
        .await
    {
        Ok(report) => report,
        Err(e) => return map_report_error(&e),
    };

    let (check, detail_errors) = match report {
        Some(report) => {
            let allocations = match AllocationRepository::new((*state.db).clone())
                .load(report.id)
                .await
            {
                Ok(allocations) => allocations,
                Err(e) => return internal_error("Failed to load allocations", &e),
            };
            (
                allocations.check(funds_received),
                AllocationValidator::validate_project_details(&allocations.project_details()),
            )
        }
        None => (
            AllocationValidator::validate(&AllocationSet::new(funds_received)),
            Vec::new(),
        ),
    };

    (
        StatusCode::OK,
        Json(json!({
            "allocation_check": check,
            "is_valid": check.is_valid(),
            "project_detail_errors": detail_errors
        })),
    )
        .into_response()
}

/// POST `/applications/{application_id}/report/submit` - Submit the current report.
async fn submit_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(application_id): Path<Uuid>,
) -> Response {
    let row = match authorize_application(&state, &auth, application_id, Access::Edit).await {
        Ok(row) => row,
        Err(response) => return response,
    };
    let report = match existing_report(&state, application_id).await {
        Ok(report) => report,
        Err(response) => return response,
    };

    let repo = ReportRepository::new((*state.db).clone());
    match repo.submit(report.id, auth.user_id()).await {
        Ok(submitted) => view_response(report_view(&state, &auth, row, submitted).await),
        Err(e) => map_report_error(&e),
    }
}

/// POST `/applications/{application_id}/report/reopen` - Reopen a submitted report (admin only).
async fn reopen_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(application_id): Path<Uuid>,
) -> Response {
    if !auth.role().can_reopen_reports() {
        return forbidden("Only administrators can reopen reports");
    }

    let row = match authorize_application(&state, &auth, application_id, Access::Read).await {
        Ok(row) => row,
        Err(response) => return response,
    };
    let report = match existing_report(&state, application_id).await {
        Ok(report) => report,
        Err(response) => return response,
    };

    let repo = ReportRepository::new((*state.db).clone());
    match repo.reopen(report.id, auth.role()).await {
        Ok(reopened) => view_response(report_view(&state, &auth, row, reopened).await),
        Err(e) => map_report_error(&e),
    }
}
