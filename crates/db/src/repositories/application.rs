//! Application repository: funded applications and their period financials.

use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use midyear_core::period::ReportingPeriod;

use crate::entities::{application_financials, applications, organizations};

/// An application together with its owning organization.
#[derive(Debug, Clone)]
pub struct ApplicationWithOrganization {
    /// The application.
    pub application: applications::Model,
    /// Owning organization, `None` only if the row was removed concurrently.
    pub organization: Option<organizations::Model>,
}

/// Repository for applications.
#[derive(Debug, Clone)]
pub struct ApplicationRepository {
    db: DatabaseConnection,
}

impl ApplicationRepository {
    /// Creates a new application repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists applications, restricted to one organization when `organization_id` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        organization_id: Option<Uuid>,
    ) -> Result<Vec<ApplicationWithOrganization>, DbErr> {
        let mut query = applications::Entity::find().find_also_related(organizations::Entity);
        if let Some(org_id) = organization_id {
            query = query.filter(applications::Column::OrganizationId.eq(org_id));
        }

        let rows = query
            .order_by_desc(applications::Column::ApplicationYear)
            .order_by_asc(applications::Column::Title)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(application, organization)| ApplicationWithOrganization {
                application,
                organization,
            })
            .collect())
    }

    /// Finds an application with its organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_with_organization(
        &self,
        id: Uuid,
    ) -> Result<Option<ApplicationWithOrganization>, DbErr> {
        let row = applications::Entity::find_by_id(id)
            .find_also_related(organizations::Entity)
            .one(&self.db)
            .await?;

        Ok(row.map(|(application, organization)| ApplicationWithOrganization {
            application,
            organization,
        }))
    }

    /// Finds the financial figures of an application for a reporting period.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn financials(
        &self,
        application_id: Uuid,
        period: ReportingPeriod,
    ) -> Result<Option<application_financials::Model>, DbErr> {
        find_financials(&self.db, application_id, period).await
    }
}

/// Looks up period financials on any connection or transaction.
pub(crate) async fn find_financials<C>(
    conn: &C,
    application_id: Uuid,
    period: ReportingPeriod,
) -> Result<Option<application_financials::Model>, DbErr>
where
    C: sea_orm::ConnectionTrait,
{
    application_financials::Entity::find()
        .filter(application_financials::Column::ApplicationId.eq(application_id))
        .filter(application_financials::Column::ReportingPeriodStart.eq(period.start()))
        .filter(application_financials::Column::ReportingPeriodEnd.eq(period.end()))
        .one(conn)
        .await
}
