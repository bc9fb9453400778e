//! Allocation reconciliation.
//!
//! Checks that project and non-project allocations add up to the funds
//! received, and that capped categories stay within their share of the
//! project allocation total.

use rust_decimal::Decimal;

use midyear_shared::types::Usd;

use super::types::{
    AllocationCheck, AllocationSet, CapEnforcement, CategoryUsage, NonProjectAllocationType,
    ProjectAllocationDetails,
};

/// Largest variance (exclusive) that still counts as balanced: one cent.
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Shown when caps cannot be applied because nothing is allocated to projects.
pub const CAPS_SUSPENDED_NOTICE: &str = "Project allocations required to enable \
     percentage-based validation for indirect costs and assessments";

/// Largest amount a single allocation or funds figure may hold: the
/// `NUMERIC(15,2)` column limit, $9,999,999,999,999.99.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_319, 232_830, 0, false, 2);

/// Reported instead of totals when summing the amounts overflows.
pub const AMOUNTS_TOO_LARGE: &str = "Allocation amounts are too large to validate";

/// Stateless allocation validator.
pub struct AllocationValidator;

impl AllocationValidator {
    /// Reconciles an allocation set.
    ///
    /// Never fails: every problem is reported as a message in
    /// [`AllocationCheck::errors`].
    #[must_use]
    pub fn validate(set: &AllocationSet) -> AllocationCheck {
        let mut errors = Vec::new();
        let mut notices = Vec::new();

        let totals = checked_sum(set.project_amounts.iter().copied()).and_then(|project| {
            let non_project = checked_sum(set.non_project.values().copied())?;
            let grand = project.checked_add(non_project)?;
            let variance = set.funds_received.checked_sub(grand)?;
            Some((project, non_project, grand, variance))
        });
        let Some((project_total, non_project_total, grand_total, variance)) = totals else {
            return overflowed(set.funds_received);
        };
        let is_balanced = variance.abs() < BALANCE_TOLERANCE;

        for (index, amount) in set.project_amounts.iter().enumerate() {
            let subject = format!("Project allocation {}", index + 1);
            errors.extend(amount_error(&subject, *amount));
        }

        for category in NonProjectAllocationType::ALL {
            errors.extend(amount_error(category.label(), set.non_project_amount(category)));
        }

        if set.funds_received.abs() > MAX_AMOUNT {
            errors.push(format!(
                "Funds received exceeds the maximum amount of {}",
                Usd(MAX_AMOUNT)
            ));
        }

        let caps = if project_total > Decimal::ZERO {
            CapEnforcement::Enforced
        } else {
            notices.push(CAPS_SUSPENDED_NOTICE.to_string());
            CapEnforcement::Suspended
        };

        let mut capped_categories = Vec::new();
        for category in NonProjectAllocationType::ALL {
            let Some(max_percentage) = category.max_percentage() else {
                continue;
            };
            let amount = set.non_project_amount(category);
            let usage = category_usage(category, amount, max_percentage, project_total, caps);

            if usage.exceeds_cap {
                let max_allowed = usage.max_allowed.unwrap_or(Decimal::ZERO);
                errors.push(format!(
                    "{} ({}) exceeds maximum allowed {}% of project allocations ({})",
                    category.label(),
                    Usd(amount),
                    max_percentage,
                    Usd(max_allowed),
                ));
            }
            capped_categories.push(usage);
        }

        if !is_balanced {
            errors.push(format!(
                "Allocations total {} does not match funds received {} (difference {})",
                Usd(grand_total),
                Usd(set.funds_received),
                Usd(variance),
            ));
        }

        AllocationCheck {
            project_total,
            non_project_total,
            grand_total,
            funds_received: set.funds_received,
            variance,
            is_balanced,
            caps,
            capped_categories,
            errors,
            notices,
        }
    }

    /// Checks the descriptive fields of every project allocation.
    ///
    /// Returns one message per allocation with blank required fields.
    #[must_use]
    pub fn validate_project_details(allocations: &[ProjectAllocationDetails]) -> Vec<String> {
        allocations
            .iter()
            .enumerate()
            .filter_map(|(index, allocation)| {
                let missing = allocation.missing_fields();
                if missing.is_empty() {
                    None
                } else {
                    Some(format!(
                        "Project allocation {} is missing: {}",
                        index + 1,
                        missing.join(", ")
                    ))
                }
            })
            .collect()
    }
}

/// Returns true when `|funds_received - grand_total| < BALANCE_TOLERANCE`.
#[must_use]
pub fn is_balanced(funds_received: Decimal, grand_total: Decimal) -> bool {
    funds_received
        .checked_sub(grand_total)
        .is_some_and(|variance| variance.abs() < BALANCE_TOLERANCE)
}

/// Result for a set whose totals cannot be represented.
fn overflowed(funds_received: Decimal) -> AllocationCheck {
    AllocationCheck {
        project_total: Decimal::ZERO,
        non_project_total: Decimal::ZERO,
        grand_total: Decimal::ZERO,
        funds_received,
        variance: Decimal::ZERO,
        is_balanced: false,
        caps: CapEnforcement::Suspended,
        capped_categories: Vec::new(),
        errors: vec![AMOUNTS_TOO_LARGE.to_string()],
        notices: Vec::new(),
    }
}

fn checked_sum(amounts: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, Decimal::checked_add)
}

/// Describes why an allocation amount cannot be stored, if it cannot.
///
/// Amounts must lie in `0..=MAX_AMOUNT`.
#[must_use]
pub fn amount_error(subject: &str, amount: Decimal) -> Option<String> {
    if amount < Decimal::ZERO {
        Some(format!("{subject} amount cannot be negative"))
    } else if amount > MAX_AMOUNT {
        Some(format!(
            "{subject} amount exceeds the maximum amount of {}",
            Usd(MAX_AMOUNT)
        ))
    } else {
        None
    }
}

fn category_usage(
    category: NonProjectAllocationType,
    amount: Decimal,
    max_percentage: Decimal,
    project_total: Decimal,
    caps: CapEnforcement,
) -> CategoryUsage {
    match caps {
        CapEnforcement::Enforced => {
            // Divide first: project_total / 100 * pct cannot exceed project_total.
            let max_allowed = (project_total / Decimal::ONE_HUNDRED).checked_mul(max_percentage);
            let percent_of_project = amount
                .checked_div(project_total)
                .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
                .map(|percent| percent.round_dp(2));
            CategoryUsage {
                category,
                amount,
                max_percentage,
                max_allowed,
                percent_of_project,
                exceeds_cap: max_allowed.is_some_and(|max| amount > max),
            }
        }
        CapEnforcement::Suspended => CategoryUsage {
            category,
            amount,
            max_percentage,
            max_allowed: None,
            percent_of_project: None,
            exceeds_cap: false,
        },
    }
}
