//! `SeaORM` Entity for application_reports table.

use super::sea_orm_active_enums::ReportStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "application_reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub application_id: Uuid,
    pub reporting_period_start: Date,
    pub reporting_period_end: Date,
    #[sea_orm(column_type = "Text", nullable)]
    pub progress_narrative: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub variance_narrative: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub financial_summary_narrative: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))", nullable)]
    pub current_funds_spent: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub project_allocations_total: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub non_project_allocations_total: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub grand_total: Decimal,
    pub status: ReportStatus,
    pub submitted_at: Option<DateTimeWithTimeZone>,
    pub submitted_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::applications::Entity",
        from = "Column::ApplicationId",
        to = "super::applications::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Applications,
    #[sea_orm(has_many = "super::project_allocations::Entity")]
    ProjectAllocations,
    #[sea_orm(has_many = "super::non_project_allocations::Entity")]
    NonProjectAllocations,
}

impl Related<super::applications::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Applications.def()
    }
}

impl Related<super::project_allocations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectAllocations.def()
    }
}

impl Related<super::non_project_allocations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::NonProjectAllocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
