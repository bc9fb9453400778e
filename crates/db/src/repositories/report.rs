//! Report repository: application reports and their status transitions.
//!
//! Status, `submitted_at` and `submitted_by` are only ever written together
//! from a [`StatusChange`], with the report row locked for the transaction.

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::OnConflict,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use midyear_core::allocation::{AllocationCheck, NonProjectAllocationType};
use midyear_core::period::{PeriodError, ReportingPeriod};
use midyear_core::report::{
    CallType as CoreCallType, ReportContent, ReportError, ReportLifecycle,
    ReportStatus as CoreReportStatus, StatusChange, SubmissionRules,
};
use midyear_shared::UserRole;
use midyear_shared::types::PageRequest;

use crate::entities::{
    application_reports, applications, organizations,
    sea_orm_active_enums::{CallType, ReportStatus},
};

use super::allocation::load_allocations;
use super::application::find_financials;

/// Error types for report operations.
#[derive(Debug, thiserror::Error)]
pub enum ReportRepositoryError {
    /// Application not found.
    #[error("Application not found: {0}")]
    ApplicationNotFound(Uuid),

    /// Report not found.
    #[error("Report not found: {0}")]
    ReportNotFound(Uuid),

    /// A non-project category was given more than once.
    #[error("Allocation type '{0}' appears more than once")]
    DuplicateAllocationType(NonProjectAllocationType),

    /// Stored reporting period is invalid.
    #[error(transparent)]
    Period(#[from] PeriodError),

    /// Lifecycle or submission rule violation.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for saving report content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveReportInput {
    /// Progress narrative.
    pub progress_narrative: Option<String>,
    /// Variance narrative.
    pub variance_narrative: Option<String>,
    /// Financial summary narrative.
    pub financial_summary_narrative: Option<String>,
    /// Funds spent so far in the period.
    pub current_funds_spent: Option<Decimal>,
}

/// Filter for the report listing.
#[derive(Debug, Clone, Default)]
pub struct ReportListFilter {
    /// Only reports in this status.
    pub status: Option<CoreReportStatus>,
    /// Only reports for this period.
    pub period: Option<ReportingPeriod>,
}

/// A report row with the application and organization it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct ReportListItem {
    /// The report.
    #[serde(flatten)]
    pub report: application_reports::Model,
    /// Application title.
    pub application_title: String,
    /// Application call type.
    pub call_type: CallType,
    /// Owning organization.
    pub organization_id: Uuid,
    /// Owning organization name.
    pub organization_name: Option<String>,
}

/// Repository for application reports.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a report by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored status is inconsistent.
    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<application_reports::Model>, ReportRepositoryError> {
        application_reports::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(verified)
            .transpose()
    }

    /// Finds the report of an application for a period.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored status is inconsistent.
    pub async fn find_for_period(
        &self,
        application_id: Uuid,
        period: ReportingPeriod,
    ) -> Result<Option<application_reports::Model>, ReportRepositoryError> {
        application_reports::Entity::find()
            .filter(application_reports::Column::ApplicationId.eq(application_id))
            .filter(application_reports::Column::ReportingPeriodStart.eq(period.start()))
            .filter(application_reports::Column::ReportingPeriodEnd.eq(period.end()))
            .one(&self.db)
            .await?
            .map(verified)
            .transpose()
    }

    /// Returns the report of an application for a period, creating it if needed.
    ///
    /// Concurrent callers receive the same row.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The application does not exist
    /// - Database operation fails
    pub async fn get_or_create(
        &self,
        application_id: Uuid,
        period: ReportingPeriod,
    ) -> Result<application_reports::Model, ReportRepositoryError> {
        if let Some(report) = self.find_for_period(application_id, period).await? {
            return Ok(report);
        }

        let exists = applications::Entity::find_by_id(application_id)
            .count(&self.db)
            .await?
            > 0;
        if !exists {
            return Err(ReportRepositoryError::ApplicationNotFound(application_id));
        }

        let now = Utc::now().into();
        let report = application_reports::ActiveModel {
            id: Set(Uuid::now_v7()),
            application_id: Set(application_id),
            reporting_period_start: Set(period.start()),
            reporting_period_end: Set(period.end()),
            status: Set(ReportStatus::NotStarted),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let inserted = application_reports::Entity::insert(report)
            .on_conflict(
                OnConflict::columns([
                    application_reports::Column::ApplicationId,
                    application_reports::Column::ReportingPeriodStart,
                    application_reports::Column::ReportingPeriodEnd,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        if inserted > 0 {
            info!(application_id = %application_id, period = %period, "Created report");
        }

        self.find_for_period(application_id, period)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("report for {application_id}")).into())
    }

    /// Saves report content and moves the report to its saved status.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The report does not exist
    /// - The report is submitted
    /// - Database operation fails
    pub async fn save_draft(
        &self,
        report_id: Uuid,
        input: SaveReportInput,
    ) -> Result<application_reports::Model, ReportRepositoryError> {
        let txn = self.db.begin().await?;

        let report = lock_report(&txn, report_id).await?;
        let change = ReportLifecycle::save(report.status.into())?;

        let mut active: application_reports::ActiveModel = report.into();
        active.progress_narrative = Set(input.progress_narrative);
        active.variance_narrative = Set(input.variance_narrative);
        active.financial_summary_narrative = Set(input.financial_summary_narrative);
        active.current_funds_spent = Set(input.current_funds_spent);
        set_status(&mut active, change, None);
        let updated = active.update(&txn).await?;

        txn.commit().await?;

        info!(report_id = %report_id, status = %change.status(), "Saved report");
        Ok(updated)
    }

    /// Submits a report after checking it against the rules of its template.
    ///
    /// The checks run on the stored content inside the same transaction that
    /// writes the new status.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The report does not exist
    /// - The report is already submitted
    /// - The report fails the submission rules
    /// - Database operation fails
    pub async fn submit(
        &self,
        report_id: Uuid,
        submitted_by: Uuid,
    ) -> Result<application_reports::Model, ReportRepositoryError> {
        let txn = self.db.begin().await?;

        let report = lock_report(&txn, report_id).await?;
        let change = ReportLifecycle::submit(report.status.into(), submitted_by, Utc::now())?;

        let application = applications::Entity::find_by_id(report.application_id)
            .one(&txn)
            .await?
            .ok_or(ReportRepositoryError::ApplicationNotFound(report.application_id))?;
        let template = CoreCallType::from(application.call_type).template();

        let stored = load_allocations(&txn, report_id).await?;
        let check = stored.check(funds_received(&txn, &report).await?);

        let content = ReportContent {
            progress_narrative: report.progress_narrative.clone(),
            variance_narrative: report.variance_narrative.clone(),
            current_funds_spent: report.current_funds_spent,
        };

        if let Err(errors) =
            SubmissionRules::check(template, &content, &stored.project_details(), &check)
        {
            warn!(
                report_id = %report_id,
                error_count = errors.len(),
                "Report submission rejected"
            );
            return Err(ReportError::ValidationFailed(errors).into());
        }

        let updated = apply_status_change(&txn, report, change, Some(&check)).await?;
        txn.commit().await?;

        info!(report_id = %report_id, submitted_by = %submitted_by, "Report submitted");
        Ok(updated)
    }

    /// Reopens a submitted report for editing.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The role may not reopen reports
    /// - The report does not exist or is not submitted
    /// - Database operation fails
    pub async fn reopen(
        &self,
        report_id: Uuid,
        role: UserRole,
    ) -> Result<application_reports::Model, ReportRepositoryError> {
        if !role.can_reopen_reports() {
            return Err(ReportError::Forbidden.into());
        }

        let txn = self.db.begin().await?;

        let report = lock_report(&txn, report_id).await?;
        let change = ReportLifecycle::reopen(report.status.into(), role)?;
        let updated = apply_status_change(&txn, report, change, None).await?;

        txn.commit().await?;

        info!(report_id = %report_id, "Report reopened");
        Ok(updated)
    }

    /// Lists reports, most recently updated first.
    ///
    /// Returns the page of reports and the total count matching the filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored status is inconsistent.
    pub async fn list(
        &self,
        filter: &ReportListFilter,
        page: &PageRequest,
    ) -> Result<(Vec<ReportListItem>, u64), ReportRepositoryError> {
        let page = page.clamped();

        let mut query = application_reports::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(application_reports::Column::Status.eq(ReportStatus::from(status)));
        }
        if let Some(period) = filter.period {
            query = query
                .filter(application_reports::Column::ReportingPeriodStart.eq(period.start()))
                .filter(application_reports::Column::ReportingPeriodEnd.eq(period.end()));
        }

        let total = query.clone().count(&self.db).await?;

        let reports = query
            .order_by_desc(application_reports::Column::UpdatedAt)
            .order_by_asc(application_reports::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        let application_ids: Vec<Uuid> = reports.iter().map(|r| r.application_id).collect();
        let mut applications_by_id: HashMap<Uuid, (applications::Model, Option<organizations::Model>)> =
            HashMap::new();
        if !application_ids.is_empty() {
            let rows = applications::Entity::find()
                .filter(applications::Column::Id.is_in(application_ids))
                .find_also_related(organizations::Entity)
                .all(&self.db)
                .await?;
            for (application, organization) in rows {
                applications_by_id.insert(application.id, (application, organization));
            }
        }

        let mut items = Vec::with_capacity(reports.len());
        for report in reports {
            let report = verified(report)?;
            let (application, organization) = applications_by_id
                .get(&report.application_id)
                .ok_or(ReportRepositoryError::ApplicationNotFound(report.application_id))?;
            items.push(ReportListItem {
                application_title: application.title.clone(),
                call_type: application.call_type,
                organization_id: application.organization_id,
                organization_name: organization.as_ref().map(|o| o.name.clone()),
                report,
            });
        }

        Ok((items, total))
    }
}

/// Returns the reporting period a stored report covers.
pub fn period_of(report: &application_reports::Model) -> Result<ReportingPeriod, PeriodError> {
    ReportingPeriod::new(report.reporting_period_start, report.reporting_period_end)
}

/// Rejects rows whose status and submission timestamp disagree.
fn verified(
    report: application_reports::Model,
) -> Result<application_reports::Model, ReportRepositoryError> {
    let submitted_at = report.submitted_at.map(|t| t.with_timezone(&Utc));
    if let Err(e) = ReportLifecycle::verify(report.status.into(), submitted_at) {
        warn!(report_id = %report.id, error = %e, "Inconsistent report row");
        return Err(e.into());
    }
    Ok(report)
}

/// Loads a report with a row lock held until the transaction ends.
pub(crate) async fn lock_report<C>(
    conn: &C,
    report_id: Uuid,
) -> Result<application_reports::Model, ReportRepositoryError>
where
    C: ConnectionTrait,
{
    let report = application_reports::Entity::find_by_id(report_id)
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or(ReportRepositoryError::ReportNotFound(report_id))?;
    verified(report)
}

/// Funds received for the report's application and period, zero when not recorded.
pub(crate) async fn funds_received<C>(
    conn: &C,
    report: &application_reports::Model,
) -> Result<Decimal, ReportRepositoryError>
where
    C: ConnectionTrait,
{
    let period = period_of(report)?;
    let financials = find_financials(conn, report.application_id, period).await?;
    Ok(financials.map_or(Decimal::ZERO, |f| f.funds_received))
}

/// Writes a status change, and optionally fresh allocation totals, in one update.
pub(crate) async fn apply_status_change<C>(
    conn: &C,
    report: application_reports::Model,
    change: StatusChange,
    totals: Option<&AllocationCheck>,
) -> Result<application_reports::Model, DbErr>
where
    C: ConnectionTrait,
{
    let mut active: application_reports::ActiveModel = report.into();
    set_status(&mut active, change, totals);
    active.update(conn).await
}

fn set_status(
    active: &mut application_reports::ActiveModel,
    change: StatusChange,
    totals: Option<&AllocationCheck>,
) {
    active.status = Set(change.status().into());
    active.submitted_at = Set(change.submitted_at().map(Into::into));
    active.submitted_by = Set(change.submitted_by());
    if let Some(check) = totals {
        active.project_allocations_total = Set(check.project_total);
        active.non_project_allocations_total = Set(check.non_project_total);
        active.grand_total = Set(check.grand_total);
    }
    active.updated_at = Set(Utc::now().into());
}
