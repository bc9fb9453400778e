//! Entity re-exports.

pub use super::application_financials::Entity as ApplicationFinancials;
pub use super::application_reports::Entity as ApplicationReports;
pub use super::applications::Entity as Applications;
pub use super::non_project_allocations::Entity as NonProjectAllocations;
pub use super::organizations::Entity as Organizations;
pub use super::project_allocation_partners::Entity as ProjectAllocationPartners;
pub use super::project_allocations::Entity as ProjectAllocations;
