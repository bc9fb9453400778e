//! Funds available and spent for a reporting period.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Financial position of an application for a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialSummary {
    /// Funds received this period.
    pub funds_received: Decimal,
    /// Funds carried over from the prior year.
    pub funds_prior_year: Decimal,
    /// Received plus prior year.
    pub total_available: Decimal,
    /// Funds spent so far.
    pub funds_spent: Decimal,
    /// Available minus spent. Negative when overspent.
    pub remaining: Decimal,
    /// Spent as a percentage of available, 2 dp. Zero when nothing is available.
    pub utilization_percent: Decimal,
}

impl FinancialSummary {
    /// Computes the summary from the period's figures.
    #[must_use]
    pub fn compute(funds_received: Decimal, funds_prior_year: Decimal, funds_spent: Decimal) -> Self {
        let total_available = funds_received + funds_prior_year;
        let utilization_percent = if total_available > Decimal::ZERO {
            (funds_spent / total_available * Decimal::ONE_HUNDRED).round_dp(2)
        } else {
            Decimal::ZERO
        };

        Self {
            funds_received,
            funds_prior_year,
            total_available,
            funds_spent,
            remaining: total_available - funds_spent,
            utilization_percent,
        }
    }

    /// Returns true when more was spent than was available.
    #[must_use]
    pub fn is_overspent(&self) -> bool {
        self.remaining < Decimal::ZERO
    }
}
