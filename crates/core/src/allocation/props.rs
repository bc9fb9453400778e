//! Property-based tests for the allocation validator.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::types::{AllocationSet, CapEnforcement, NonProjectAllocationType};
use super::validator::AllocationValidator;

/// Amounts in cents between $0.00 and $1,000,000.00.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Any representable decimal, including the extremes.
fn arb_extreme() -> impl Strategy<Value = Decimal> {
    (any::<u32>(), any::<u32>(), any::<u32>(), any::<bool>(), 0u32..=28)
        .prop_map(|(lo, mid, hi, negative, scale)| Decimal::from_parts(lo, mid, hi, negative, scale))
}

fn arb_category() -> impl Strategy<Value = NonProjectAllocationType> {
    prop_oneof![
        Just(NonProjectAllocationType::IndirectCosts),
        Just(NonProjectAllocationType::Assessments),
        Just(NonProjectAllocationType::UnusedFunds),
        Just(NonProjectAllocationType::Other),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Totals always add up, and variance is funds received minus grand total.
    #[test]
    fn prop_totals_are_consistent(
        projects in prop::collection::vec(arb_amount(), 0..8),
        indirect in arb_amount(),
        other in arb_amount(),
        funds in arb_amount(),
    ) {
        let mut set = AllocationSet::new(funds)
            .with_non_project(NonProjectAllocationType::IndirectCosts, indirect)
            .with_non_project(NonProjectAllocationType::Other, other);
        for amount in &projects {
            set = set.with_project(*amount);
        }
        let check = AllocationValidator::validate(&set);

        prop_assert_eq!(check.project_total, projects.iter().copied().sum::<Decimal>());
        prop_assert_eq!(check.non_project_total, indirect + other);
        prop_assert_eq!(check.grand_total, check.project_total + check.non_project_total);
        prop_assert_eq!(check.variance, funds - check.grand_total);
    }

    /// A set whose funds received equal its grand total is balanced.
    #[test]
    fn prop_exact_funds_balance(
        projects in prop::collection::vec(arb_amount(), 1..8),
        unused in arb_amount(),
    ) {
        let total = projects.iter().copied().sum::<Decimal>() + unused;
        let mut set = AllocationSet::new(total)
            .with_non_project(NonProjectAllocationType::UnusedFunds, unused);
        for amount in projects {
            set = set.with_project(amount);
        }
        let check = AllocationValidator::validate(&set);

        prop_assert!(check.is_balanced);
    }

    /// Valid implies balanced and error free.
    #[test]
    fn prop_valid_implies_balanced(
        projects in prop::collection::vec(arb_amount(), 0..5),
        category in arb_category(),
        amount in arb_amount(),
        funds in arb_amount(),
    ) {
        let mut set = AllocationSet::new(funds).with_non_project(category, amount);
        for p in projects {
            set = set.with_project(p);
        }
        let check = AllocationValidator::validate(&set);

        if check.is_valid() {
            prop_assert!(check.is_balanced);
            prop_assert!(check.errors.is_empty());
        }
    }

    /// Any negative amount makes the set invalid, whatever the totals.
    #[test]
    fn prop_negative_amount_is_invalid(
        project in arb_amount(),
        category in arb_category(),
        negative in 1i64..10_000_000,
    ) {
        let negative = Decimal::new(-negative, 2);
        let set = AllocationSet::new(project + negative)
            .with_project(project)
            .with_non_project(category, negative);
        let check = AllocationValidator::validate(&set);

        prop_assert!(!check.is_valid());
        let expected = format!("{} amount cannot be negative", category.label());
        prop_assert!(check.errors.contains(&expected));
    }

    /// Caps are suspended exactly when nothing is allocated to projects.
    #[test]
    fn prop_zero_project_total_never_exceeds_caps(
        indirect in arb_amount(),
        assessments in arb_amount(),
    ) {
        let set = AllocationSet::new(indirect + assessments)
            .with_non_project(NonProjectAllocationType::IndirectCosts, indirect)
            .with_non_project(NonProjectAllocationType::Assessments, assessments);
        let check = AllocationValidator::validate(&set);

        prop_assert_eq!(check.caps, CapEnforcement::Suspended);
        prop_assert!(check.capped_categories.iter().all(|u| !u.exceeds_cap));
        prop_assert!(check.is_valid());
        prop_assert_eq!(check.notices.len(), 1);
    }

    /// Indirect costs at or below 20% never exceed the cap; above it always do.
    #[test]
    fn prop_indirect_cap_boundary(project_cents in 1i64..100_000_000, over_cents in 1i64..1_000_000) {
        let project = Decimal::new(project_cents, 2);
        let cap = project * Decimal::new(20, 2);

        let at_cap = AllocationSet::new(project + cap)
            .with_project(project)
            .with_non_project(NonProjectAllocationType::IndirectCosts, cap);
        prop_assert!(AllocationValidator::validate(&at_cap).is_valid());

        let over = cap + Decimal::new(over_cents, 2);
        let over_cap = AllocationSet::new(project + over)
            .with_project(project)
            .with_non_project(NonProjectAllocationType::IndirectCosts, over);
        let check = AllocationValidator::validate(&over_cap);
        prop_assert!(!check.is_valid());
        prop_assert_eq!(check.errors.len(), 1);
    }

    /// Validation reports rather than panics on amounts of any magnitude.
    #[test]
    fn prop_extreme_amounts_never_panic(
        projects in prop::collection::vec(arb_extreme(), 0..4),
        category in arb_category(),
        amount in arb_extreme(),
        funds in arb_extreme(),
    ) {
        let mut set = AllocationSet::new(funds).with_non_project(category, amount);
        for p in projects {
            set = set.with_project(p);
        }
        let check = AllocationValidator::validate(&set);

        if !check.is_balanced {
            prop_assert!(!check.is_valid());
        }
    }
}
