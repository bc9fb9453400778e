//! Allocation reconciliation for mid-year reports.
//!
//! # Modules
//!
//! - `types` - Allocation sets, categories and check results
//! - `validator` - Balance and percentage-cap validation

pub mod types;
pub mod validator;

#[cfg(test)]
mod props;

pub use types::{
    AllocationCheck, AllocationSet, CapEnforcement, CategoryUsage, NonProjectAllocationType,
    ProjectAllocationDetails,
};
pub use validator::{
    AMOUNTS_TOO_LARGE, AllocationValidator, BALANCE_TOLERANCE, CAPS_SUSPENDED_NOTICE, MAX_AMOUNT,
    amount_error, is_balanced,
};
