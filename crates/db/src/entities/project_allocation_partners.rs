//! `SeaORM` Entity for project_allocation_partners table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "project_allocation_partners")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_allocation_id: Uuid,
    pub partner_organization_name: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::project_allocations::Entity",
        from = "Column::ProjectAllocationId",
        to = "super::project_allocations::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    ProjectAllocations,
}

impl Related<super::project_allocations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectAllocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
