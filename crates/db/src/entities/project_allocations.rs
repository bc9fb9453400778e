//! `SeaORM` Entity for project_allocations table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "project_allocations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub report_id: Uuid,
    pub position: i32,
    pub language_name: String,
    pub language_code: String,
    pub country: String,
    pub dialect_number: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub amount: Decimal,
    pub all_access_goal: Option<String>,
    pub all_access_status: Option<String>,
    pub eligible_for_funding: Option<bool>,
    pub language_population_group: Option<String>,
    pub first_language_population: Option<i64>,
    pub egids_level: Option<String>,
    pub is_sign_language: Option<bool>,
    pub region: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::application_reports::Entity",
        from = "Column::ReportId",
        to = "super::application_reports::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    ApplicationReports,
    #[sea_orm(has_many = "super::project_allocation_partners::Entity")]
    ProjectAllocationPartners,
}

impl Related<super::application_reports::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ApplicationReports.def()
    }
}

impl Related<super::project_allocation_partners::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectAllocationPartners.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
