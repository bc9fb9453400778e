//! Allocation repository: project and non-project allocations of a report.
//!
//! Every write replaces the full set inside one transaction, moves the report
//! to its saved status and refreshes the stored totals.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use midyear_core::allocation::{
    AllocationCheck, AllocationSet, AllocationValidator, NonProjectAllocationType,
    ProjectAllocationDetails,
};
use midyear_core::report::ReportLifecycle;

use crate::entities::{
    non_project_allocations, project_allocation_partners, project_allocations,
};

use super::report::{ReportRepositoryError, apply_status_change, funds_received, lock_report};

/// Input for one project allocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectAllocationInput {
    /// Language name.
    pub language_name: String,
    /// Language code.
    pub language_code: String,
    /// Country.
    pub country: String,
    /// Dialect number.
    pub dialect_number: Option<String>,
    /// Amount allocated.
    pub amount: Decimal,
    /// All Access goal.
    pub all_access_goal: Option<String>,
    /// All Access status.
    pub all_access_status: Option<String>,
    /// Whether the language is eligible for funding.
    pub eligible_for_funding: Option<bool>,
    /// Population group.
    pub language_population_group: Option<String>,
    /// First-language population.
    pub first_language_population: Option<i64>,
    /// EGIDS level.
    pub egids_level: Option<String>,
    /// Whether this is a sign language.
    pub is_sign_language: Option<bool>,
    /// Region.
    pub region: Option<String>,
    /// Implementing partner names. Blank names are dropped.
    #[serde(default)]
    pub partners: Vec<String>,
}

/// Input for one non-project allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NonProjectAllocationInput {
    /// Category.
    pub allocation_type: NonProjectAllocationType,
    /// Amount. Zero amounts are not stored.
    pub amount: Decimal,
    /// Optional description.
    pub description: Option<String>,
}

/// A project allocation with its partners.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectAllocationWithPartners {
    /// The allocation row.
    #[serde(flatten)]
    pub allocation: project_allocations::Model,
    /// Partner rows.
    pub partners: Vec<project_allocation_partners::Model>,
}

/// Every allocation stored for a report.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoredAllocations {
    /// Project allocations in entry order.
    pub projects: Vec<ProjectAllocationWithPartners>,
    /// Non-project allocations, at most one per category.
    pub non_project: Vec<non_project_allocations::Model>,
}

impl StoredAllocations {
    /// Builds the validator input against the funds received.
    #[must_use]
    pub fn allocation_set(&self, funds_received: Decimal) -> AllocationSet {
        let non_project: BTreeMap<NonProjectAllocationType, Decimal> = self
            .non_project
            .iter()
            .map(|row| (row.allocation_type.into(), row.amount))
            .collect();

        AllocationSet {
            project_amounts: self.projects.iter().map(|p| p.allocation.amount).collect(),
            non_project,
            funds_received,
        }
    }

    /// Descriptive fields of each project allocation.
    #[must_use]
    pub fn project_details(&self) -> Vec<ProjectAllocationDetails> {
        self.projects
            .iter()
            .map(|p| ProjectAllocationDetails {
                language_name: p.allocation.language_name.clone(),
                language_code: p.allocation.language_code.clone(),
                country: p.allocation.country.clone(),
                amount: p.allocation.amount,
                partners: p
                    .partners
                    .iter()
                    .map(|partner| partner.partner_organization_name.clone())
                    .collect(),
            })
            .collect()
    }

    /// Runs the allocation validator on the stored amounts.
    #[must_use]
    pub fn check(&self, funds_received: Decimal) -> AllocationCheck {
        AllocationValidator::validate(&self.allocation_set(funds_received))
    }
}

/// Repository for report allocations.
#[derive(Debug, Clone)]
pub struct AllocationRepository {
    db: DatabaseConnection,
}

impl AllocationRepository {
    /// Creates a new allocation repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads every allocation of a report.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn load(&self, report_id: Uuid) -> Result<StoredAllocations, DbErr> {
        load_allocations(&self.db, report_id).await
    }

    /// Replaces all project allocations and their partners of a report.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The report does not exist
    /// - The report is submitted
    /// - Database operation fails
    pub async fn replace_project_allocations(
        &self,
        report_id: Uuid,
        inputs: Vec<ProjectAllocationInput>,
    ) -> Result<StoredAllocations, ReportRepositoryError> {
        let txn = self.db.begin().await?;

        let report = lock_report(&txn, report_id).await?;
        let change = ReportLifecycle::save(report.status.into())?;

        project_allocations::Entity::delete_many()
            .filter(project_allocations::Column::ReportId.eq(report_id))
            .exec(&txn)
            .await?;

        let now = Utc::now().into();
        let count = inputs.len();
        for (position, input) in (0i32..).zip(inputs) {
            let allocation_id = Uuid::now_v7();
            project_allocations::ActiveModel {
                id: Set(allocation_id),
                report_id: Set(report_id),
                position: Set(position),
                language_name: Set(input.language_name.trim().to_string()),
                language_code: Set(input.language_code.trim().to_string()),
                country: Set(input.country.trim().to_string()),
                dialect_number: Set(input.dialect_number),
                amount: Set(input.amount),
                all_access_goal: Set(input.all_access_goal),
                all_access_status: Set(input.all_access_status),
                eligible_for_funding: Set(input.eligible_for_funding),
                language_population_group: Set(input.language_population_group),
                first_language_population: Set(input.first_language_population),
                egids_level: Set(input.egids_level),
                is_sign_language: Set(input.is_sign_language),
                region: Set(input.region),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&txn)
            .await?;

            for name in input.partners {
                let name = name.trim();
                if name.is_empty() {
                    continue;
                }
                project_allocation_partners::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    project_allocation_id: Set(allocation_id),
                    partner_organization_name: Set(name.to_string()),
                    created_at: Set(now),
                }
                .insert(&txn)
                .await?;
            }
        }

        let stored = load_allocations(&txn, report_id).await?;
        let check = stored.check(funds_received(&txn, &report).await?);
        apply_status_change(&txn, report, change, Some(&check)).await?;

        txn.commit().await?;

        info!(report_id = %report_id, count, "Replaced project allocations");
        Ok(stored)
    }

    /// Replaces all non-project allocations of a report.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The report does not exist
    /// - The report is submitted
    /// - A category appears twice
    /// - Database operation fails
    pub async fn replace_non_project_allocations(
        &self,
        report_id: Uuid,
        inputs: Vec<NonProjectAllocationInput>,
    ) -> Result<StoredAllocations, ReportRepositoryError> {
        let mut by_type = BTreeMap::new();
        for input in inputs {
            let kind = input.allocation_type;
            if by_type.insert(kind, input).is_some() {
                return Err(ReportRepositoryError::DuplicateAllocationType(kind));
            }
        }

        let txn = self.db.begin().await?;

        let report = lock_report(&txn, report_id).await?;
        let change = ReportLifecycle::save(report.status.into())?;

        non_project_allocations::Entity::delete_many()
            .filter(non_project_allocations::Column::ReportId.eq(report_id))
            .exec(&txn)
            .await?;

        let now = Utc::now().into();
        for (kind, input) in by_type {
            if input.amount.is_zero() {
                continue;
            }
            non_project_allocations::ActiveModel {
                id: Set(Uuid::now_v7()),
                report_id: Set(report_id),
                allocation_type: Set(kind.into()),
                amount: Set(input.amount),
                description: Set(input.description),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&txn)
            .await?;
        }

        let stored = load_allocations(&txn, report_id).await?;
        let check = stored.check(funds_received(&txn, &report).await?);
        apply_status_change(&txn, report, change, Some(&check)).await?;

        txn.commit().await?;

        info!(
            report_id = %report_id,
            count = stored.non_project.len(),
            "Replaced non-project allocations"
        );
        Ok(stored)
    }
}

/// Loads every allocation of a report on any connection or transaction.
pub(crate) async fn load_allocations<C>(
    conn: &C,
    report_id: Uuid,
) -> Result<StoredAllocations, DbErr>
where
    C: ConnectionTrait,
{
    let allocations = project_allocations::Entity::find()
        .filter(project_allocations::Column::ReportId.eq(report_id))
        .order_by_asc(project_allocations::Column::Position)
        .all(conn)
        .await?;

    let ids: Vec<Uuid> = allocations.iter().map(|a| a.id).collect();
    let mut partners_by_allocation: HashMap<Uuid, Vec<project_allocation_partners::Model>> =
        HashMap::new();
    if !ids.is_empty() {
        let partners = project_allocation_partners::Entity::find()
            .filter(project_allocation_partners::Column::ProjectAllocationId.is_in(ids))
            .order_by_asc(project_allocation_partners::Column::CreatedAt)
            .order_by_asc(project_allocation_partners::Column::Id)
            .all(conn)
            .await?;
        for partner in partners {
            partners_by_allocation
                .entry(partner.project_allocation_id)
                .or_default()
                .push(partner);
        }
    }

    let projects = allocations
        .into_iter()
        .map(|allocation| ProjectAllocationWithPartners {
            partners: partners_by_allocation
                .remove(&allocation.id)
                .unwrap_or_default(),
            allocation,
        })
        .collect();

    let non_project = non_project_allocations::Entity::find()
        .filter(non_project_allocations::Column::ReportId.eq(report_id))
        .order_by_asc(non_project_allocations::Column::AllocationType)
        .all(conn)
        .await?;

    Ok(StoredAllocations {
        projects,
        non_project,
    })
}
