//! Mid-year report lifecycle and submission rules.
//!
//! # Modules
//!
//! - `types` - Report status, call types and templates
//! - `error` - Report error types
//! - `lifecycle` - Status transitions
//! - `submission` - Submission readiness checks

pub mod error;
pub mod lifecycle;
pub mod submission;
pub mod types;

#[cfg(test)]
mod lifecycle_props;

pub use error::ReportError;
pub use lifecycle::ReportLifecycle;
pub use submission::{ReportContent, SubmissionErrors, SubmissionRules, SubmissionSection};
pub use types::{CallType, ReportStatus, ReportTemplate, StatusChange};
