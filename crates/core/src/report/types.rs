//! Report domain types: status, call type, template and status changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Status of an application report.
///
/// The valid transitions are:
/// - NotStarted → Draft (save)
/// - Draft → Draft (save)
/// - NotStarted | Draft | Reopened → Submitted (submit)
/// - Submitted → Reopened (reopen, admin only)
/// - Reopened → Reopened (save)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// No content saved yet.
    NotStarted,
    /// Saved at least once, not submitted.
    Draft,
    /// Submitted and locked.
    Submitted,
    /// Reopened by an administrator; editable like a draft.
    Reopened,
}

impl ReportStatus {
    /// Every status.
    pub const ALL: [Self; 4] = [
        Self::NotStarted,
        Self::Draft,
        Self::Submitted,
        Self::Reopened,
    ];

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Reopened => "reopened",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "not_started" => Some(Self::NotStarted),
            "draft" => Some(Self::Draft),
            "submitted" => Some(Self::Submitted),
            "reopened" => Some(Self::Reopened),
            _ => None,
        }
    }

    /// Returns true if the report content can be modified.
    #[must_use]
    pub const fn is_editable(self) -> bool {
        !matches!(self, Self::Submitted)
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Funding call an application was awarded under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallType {
    /// "Translation Investment"
    #[serde(rename = "Translation Investment")]
    TranslationInvestment,
    /// "illumiNations Undesignated"
    #[serde(rename = "illumiNations Undesignated")]
    IllumiNationsUndesignated,
    /// "Translation Tools"
    #[serde(rename = "Translation Tools")]
    TranslationTools,
    /// "Capacity Building - Quality Assurance"
    #[serde(rename = "Capacity Building - Quality Assurance")]
    CapacityBuildingQualityAssurance,
}

impl CallType {
    /// Returns the label stored with the application.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TranslationInvestment => "Translation Investment",
            Self::IllumiNationsUndesignated => "illumiNations Undesignated",
            Self::TranslationTools => "Translation Tools",
            Self::CapacityBuildingQualityAssurance => "Capacity Building - Quality Assurance",
        }
    }

    /// Parses a call type label, accepting the older aliases.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim() {
            "Translation Investment" => Some(Self::TranslationInvestment),
            "illumiNations Undesignated" => Some(Self::IllumiNationsUndesignated),
            "Translation Tools" | "Translation Tool" => Some(Self::TranslationTools),
            "Capacity Building - Quality Assurance"
            | "Quality Assurance"
            | "Organizational Development" => Some(Self::CapacityBuildingQualityAssurance),
            _ => None,
        }
    }

    /// Returns the report template used for this call type.
    #[must_use]
    pub const fn template(self) -> ReportTemplate {
        match self {
            Self::TranslationInvestment | Self::IllumiNationsUndesignated => {
                ReportTemplate::Investment
            }
            Self::TranslationTools | Self::CapacityBuildingQualityAssurance => {
                ReportTemplate::ToolCapacity
            }
        }
    }
}

impl fmt::Display for CallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Report form used for a call type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportTemplate {
    /// Language project investment: narratives plus project and non-project allocations.
    Investment,
    /// Tools and capacity building: narratives and funds spent only.
    ToolCapacity,
}

impl ReportTemplate {
    /// Resolves the template for a stored call type label.
    pub fn for_label(label: &str) -> Option<Self> {
        CallType::parse(label).map(CallType::template)
    }

    /// Maximum characters in each narrative field.
    #[must_use]
    pub const fn narrative_limit(self) -> usize {
        match self {
            Self::Investment => 1500,
            Self::ToolCapacity => 2000,
        }
    }

    /// Returns true if the report must carry project allocations.
    #[must_use]
    pub const fn requires_allocations(self) -> bool {
        matches!(self, Self::Investment)
    }
}

/// A status transition together with the submission columns it implies.
///
/// `submitted_at` and `submitted_by` are `Some` exactly when `status` is
/// [`ReportStatus::Submitted`]. Constructed only by the report lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    status: ReportStatus,
    submitted_at: Option<DateTime<Utc>>,
    submitted_by: Option<Uuid>,
}

impl StatusChange {
    pub(crate) const fn unsubmitted(status: ReportStatus) -> Self {
        Self {
            status,
            submitted_at: None,
            submitted_by: None,
        }
    }

    pub(crate) const fn submitted(at: DateTime<Utc>, by: Uuid) -> Self {
        Self {
            status: ReportStatus::Submitted,
            submitted_at: Some(at),
            submitted_by: Some(by),
        }
    }

    /// The new status.
    #[must_use]
    pub const fn status(&self) -> ReportStatus {
        self.status
    }

    /// Submission timestamp to store.
    #[must_use]
    pub const fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    /// Submitting user to store.
    #[must_use]
    pub const fn submitted_by(&self) -> Option<Uuid> {
        self.submitted_by
    }
}
