//! `SeaORM` Entity for applications table.

use super::sea_orm_active_enums::CallType;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "applications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub title: String,
    pub call_type: CallType,
    pub funding_stream: Option<String>,
    pub application_reference: Option<String>,
    pub award_reference: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))", nullable)]
    pub total_awarded: Option<Decimal>,
    pub application_year: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organizations::Entity",
        from = "Column::OrganizationId",
        to = "super::organizations::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Organizations,
    #[sea_orm(has_many = "super::application_reports::Entity")]
    ApplicationReports,
    #[sea_orm(has_many = "super::application_financials::Entity")]
    ApplicationFinancials,
}

impl Related<super::organizations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organizations.def()
    }
}

impl Related<super::application_reports::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ApplicationReports.def()
    }
}

impl Related<super::application_financials::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ApplicationFinancials.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
