//! `SeaORM` entity definitions.

#![allow(missing_docs)]

pub mod prelude;

pub mod application_financials;
pub mod application_reports;
pub mod applications;
pub mod non_project_allocations;
pub mod organizations;
pub mod project_allocation_partners;
pub mod project_allocations;
pub mod sea_orm_active_enums;
