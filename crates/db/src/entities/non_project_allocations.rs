//! `SeaORM` Entity for non_project_allocations table.

use super::sea_orm_active_enums::NonProjectAllocationType;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "non_project_allocations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub report_id: Uuid,
    pub allocation_type: NonProjectAllocationType,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub amount: Decimal,
    pub description: Option<String>,
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
}

impl Related<super::application_reports::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ApplicationReports.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
