//! Property-based tests for the report lifecycle.

use chrono::{DateTime, Utc};
use proptest::prelude::*;
use uuid::Uuid;

use midyear_shared::UserRole;

use crate::report::lifecycle::ReportLifecycle;
use crate::report::types::ReportStatus;

fn arb_status() -> impl Strategy<Value = ReportStatus> {
    prop_oneof![
        Just(ReportStatus::NotStarted),
        Just(ReportStatus::Draft),
        Just(ReportStatus::Submitted),
        Just(ReportStatus::Reopened),
    ]
}

fn arb_role() -> impl Strategy<Value = UserRole> {
    prop_oneof![
        Just(UserRole::Admin),
        Just(UserRole::Staff),
        Just(UserRole::OrgUser),
    ]
}

fn arb_uuid() -> impl Strategy<Value = Uuid> {
    any::<u128>().prop_map(Uuid::from_u128)
}

fn arb_time() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_102_444_800).prop_map(|secs| DateTime::from_timestamp(secs, 0).unwrap_or_default())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every successful transition yields a change that passes verification.
    #[test]
    fn prop_transitions_keep_timestamp_consistent(
        status in arb_status(),
        role in arb_role(),
        user in arb_uuid(),
        now in arb_time(),
    ) {
        let changes = [
            ReportLifecycle::save(status),
            ReportLifecycle::submit(status, user, now),
            ReportLifecycle::reopen(status, role),
        ];
        for change in changes.into_iter().flatten() {
            prop_assert!(ReportLifecycle::verify(change.status(), change.submitted_at()).is_ok());
            prop_assert_eq!(change.submitted_by().is_some(), change.submitted_at().is_some());
        }
    }

    /// A submitted report can only leave the submitted state by reopening.
    #[test]
    fn prop_submitted_is_locked(role in arb_role(), user in arb_uuid(), now in arb_time()) {
        prop_assert!(ReportLifecycle::save(ReportStatus::Submitted).is_err());
        prop_assert!(ReportLifecycle::submit(ReportStatus::Submitted, user, now).is_err());
        prop_assert_eq!(
            ReportLifecycle::reopen(ReportStatus::Submitted, role).is_ok(),
            role == UserRole::Admin
        );
    }

    /// Saving never changes an editable report's submitted state.
    #[test]
    fn prop_save_keeps_unsubmitted(status in arb_status()) {
        if let Ok(change) = ReportLifecycle::save(status) {
            prop_assert!(change.status().is_editable());
            prop_assert_ne!(change.status(), ReportStatus::NotStarted);
        }
    }
}
