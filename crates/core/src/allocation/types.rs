//! Allocation data types.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Category of a non-project allocation.
///
/// A report holds at most one allocation per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonProjectAllocationType {
    /// Indirect costs, capped at 20% of project allocations.
    IndirectCosts,
    /// Assessments, capped at 15% of project allocations.
    Assessments,
    /// Funds from previous periods that remain unused.
    UnusedFunds,
    /// Anything else.
    Other,
}

impl NonProjectAllocationType {
    /// Every category, in display order.
    pub const ALL: [Self; 4] = [
        Self::IndirectCosts,
        Self::Assessments,
        Self::UnusedFunds,
        Self::Other,
    ];

    /// Returns the string representation of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IndirectCosts => "indirect_costs",
            Self::Assessments => "assessments",
            Self::UnusedFunds => "unused_funds",
            Self::Other => "other",
        }
    }

    /// Parses a category from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "indirect_costs" => Some(Self::IndirectCosts),
            "assessments" => Some(Self::Assessments),
            "unused_funds" => Some(Self::UnusedFunds),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// Human-readable label used in validation messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::IndirectCosts => "Indirect Costs",
            Self::Assessments => "Assessments",
            Self::UnusedFunds => "Unused Funds",
            Self::Other => "Other",
        }
    }

    /// Maximum share of the project allocation total, in percent.
    ///
    /// `None` for uncapped categories.
    #[must_use]
    pub const fn max_percentage(self) -> Option<Decimal> {
        match self {
            Self::IndirectCosts => Some(Decimal::from_parts(20, 0, 0, false, 0)),
            Self::Assessments => Some(Decimal::from_parts(15, 0, 0, false, 0)),
            Self::UnusedFunds | Self::Other => None,
        }
    }
}

impl std::fmt::Display for NonProjectAllocationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Amounts to reconcile against the funds received for a reporting period.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllocationSet {
    /// Amount of each project (language) allocation.
    #[serde(default)]
    pub project_amounts: Vec<Decimal>,
    /// Amount per non-project category. Missing categories count as zero.
    #[serde(default)]
    pub non_project: BTreeMap<NonProjectAllocationType, Decimal>,
    /// Funds received for the period.
    #[serde(default)]
    pub funds_received: Decimal,
}

impl AllocationSet {
    /// Creates an empty set against the given funds received.
    #[must_use]
    pub fn new(funds_received: Decimal) -> Self {
        Self {
            funds_received,
            ..Self::default()
        }
    }

    /// Adds a project allocation amount.
    #[must_use]
    pub fn with_project(mut self, amount: Decimal) -> Self {
        self.project_amounts.push(amount);
        self
    }

    /// Sets the amount for a non-project category, replacing any previous value.
    #[must_use]
    pub fn with_non_project(mut self, category: NonProjectAllocationType, amount: Decimal) -> Self {
        self.non_project.insert(category, amount);
        self
    }

    /// Returns the amount recorded for a category, zero when absent.
    #[must_use]
    pub fn non_project_amount(&self, category: NonProjectAllocationType) -> Decimal {
        self.non_project
            .get(&category)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

/// Whether percentage caps were applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapEnforcement {
    /// Project total is positive; caps were checked.
    Enforced,
    /// Project total is not positive (nothing allocated to projects); caps were skipped.
    Suspended,
}

/// Usage of a capped non-project category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryUsage {
    /// The capped category.
    pub category: NonProjectAllocationType,
    /// Amount allocated to it.
    pub amount: Decimal,
    /// Cap as a percentage of the project total.
    pub max_percentage: Decimal,
    /// Cap in dollars. `None` while caps are suspended.
    pub max_allowed: Option<Decimal>,
    /// Amount as a percentage of the project total, 2 dp. `None` while caps are suspended.
    pub percent_of_project: Option<Decimal>,
    /// True when the amount is above the cap.
    pub exceeds_cap: bool,
}

/// Result of reconciling an [`AllocationSet`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationCheck {
    /// Sum of project allocations.
    pub project_total: Decimal,
    /// Sum of non-project allocations.
    pub non_project_total: Decimal,
    /// Project plus non-project total.
    pub grand_total: Decimal,
    /// Funds received for the period.
    pub funds_received: Decimal,
    /// `funds_received - grand_total`.
    pub variance: Decimal,
    /// True when the variance is under one cent in magnitude.
    pub is_balanced: bool,
    /// Whether percentage caps were applied.
    pub caps: CapEnforcement,
    /// Usage of each capped category.
    pub capped_categories: Vec<CategoryUsage>,
    /// Blocking problems, ready for display.
    pub errors: Vec<String>,
    /// Non-blocking information, ready for display.
    pub notices: Vec<String>,
}

impl AllocationCheck {
    /// Returns true when the allocations balance and break no rule.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_balanced && self.errors.is_empty()
    }

    /// Returns the usage entry for a capped category.
    #[must_use]
    pub fn usage(&self, category: NonProjectAllocationType) -> Option<&CategoryUsage> {
        self.capped_categories
            .iter()
            .find(|usage| usage.category == category)
    }
}

/// Descriptive fields a project allocation must carry before submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectAllocationDetails {
    /// Language name from the reference dataset.
    pub language_name: String,
    /// Language code from the reference dataset.
    pub language_code: String,
    /// Country the project works in.
    pub country: String,
    /// Amount allocated.
    pub amount: Decimal,
    /// Implementing partner organization names.
    pub partners: Vec<String>,
}

impl ProjectAllocationDetails {
    /// Returns the names of required fields that are blank.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.language_name.trim().is_empty() {
            missing.push("language name");
        }
        if self.language_code.trim().is_empty() {
            missing.push("language code");
        }
        if self.country.trim().is_empty() {
            missing.push("country");
        }
        if !self.partners.iter().any(|p| !p.trim().is_empty()) {
            missing.push("partner organization");
        }
        missing
    }
}
