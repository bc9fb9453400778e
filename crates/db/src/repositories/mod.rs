//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod allocation;
pub mod application;
pub mod report;

pub use allocation::{
    AllocationRepository, NonProjectAllocationInput, ProjectAllocationInput,
    ProjectAllocationWithPartners, StoredAllocations,
};
pub use application::{ApplicationRepository, ApplicationWithOrganization};
pub use report::{
    ReportListFilter, ReportListItem, ReportRepository, ReportRepositoryError, SaveReportInput,
    period_of,
};
