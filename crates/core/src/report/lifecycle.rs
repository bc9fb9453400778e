//! Report status transitions.
//!
//! Every transition returns a [`StatusChange`] carrying the new status and
//! the submission columns together, so they are always written in one update.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use midyear_shared::UserRole;

use crate::report::error::ReportError;
use crate::report::types::{ReportStatus, StatusChange};

/// Stateless report state machine.
pub struct ReportLifecycle;

impl ReportLifecycle {
    /// Saves report content.
    ///
    /// `NotStarted` and `Draft` become `Draft`; `Reopened` stays `Reopened`.
    ///
    /// # Errors
    /// * `ReportError::ReportLocked` if the report is submitted
    pub fn save(current_status: ReportStatus) -> Result<StatusChange, ReportError> {
        match current_status {
            ReportStatus::NotStarted | ReportStatus::Draft => {
                Ok(StatusChange::unsubmitted(ReportStatus::Draft))
            }
            ReportStatus::Reopened => Ok(StatusChange::unsubmitted(ReportStatus::Reopened)),
            ReportStatus::Submitted => Err(ReportError::ReportLocked),
        }
    }

    /// Submits a report.
    ///
    /// # Errors
    /// * `ReportError::AlreadySubmitted` if the report is already submitted
    pub fn submit(
        current_status: ReportStatus,
        submitted_by: Uuid,
        now: DateTime<Utc>,
    ) -> Result<StatusChange, ReportError> {
        match current_status {
            ReportStatus::Submitted => Err(ReportError::AlreadySubmitted),
            _ => Ok(StatusChange::submitted(now, submitted_by)),
        }
    }

    /// Reopens a submitted report, clearing its submission columns.
    ///
    /// # Errors
    /// * `ReportError::Forbidden` unless `role` may reopen reports
    /// * `ReportError::NotSubmitted` if the report is not submitted
    pub fn reopen(current_status: ReportStatus, role: UserRole) -> Result<StatusChange, ReportError> {
        if !role.can_reopen_reports() {
            return Err(ReportError::Forbidden);
        }
        match current_status {
            ReportStatus::Submitted => Ok(StatusChange::unsubmitted(ReportStatus::Reopened)),
            status => Err(ReportError::NotSubmitted { status }),
        }
    }

    /// Checks a stored status against its submission timestamp.
    ///
    /// # Errors
    /// * `ReportError::Inconsistent` if exactly one of "status is submitted"
    ///   and "timestamp is present" holds
    pub fn verify(
        status: ReportStatus,
        submitted_at: Option<DateTime<Utc>>,
    ) -> Result<(), ReportError> {
        if (status == ReportStatus::Submitted) == submitted_at.is_some() {
            Ok(())
        } else {
            Err(ReportError::Inconsistent {
                status,
                submitted_at,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ReportStatus::NotStarted, ReportStatus::Draft)]
    #[case(ReportStatus::Draft, ReportStatus::Draft)]
    #[case(ReportStatus::Reopened, ReportStatus::Reopened)]
    fn test_save_transitions(#[case] from: ReportStatus, #[case] to: ReportStatus) {
        let change = ReportLifecycle::save(from).unwrap();
        assert_eq!(change.status(), to);
        assert_eq!(change.submitted_at(), None);
        assert_eq!(change.submitted_by(), None);
    }

    #[test]
    fn test_save_submitted_is_locked() {
        assert!(matches!(
            ReportLifecycle::save(ReportStatus::Submitted),
            Err(ReportError::ReportLocked)
        ));
    }

    #[rstest]
    #[case(ReportStatus::NotStarted)]
    #[case(ReportStatus::Draft)]
    #[case(ReportStatus::Reopened)]
    fn test_submit_sets_timestamp(#[case] from: ReportStatus) {
        let user = Uuid::new_v4();
        let now = Utc::now();
        let change = ReportLifecycle::submit(from, user, now).unwrap();

        assert_eq!(change.status(), ReportStatus::Submitted);
        assert_eq!(change.submitted_at(), Some(now));
        assert_eq!(change.submitted_by(), Some(user));
    }

    #[test]
    fn test_submit_twice_fails() {
        assert!(matches!(
            ReportLifecycle::submit(ReportStatus::Submitted, Uuid::new_v4(), Utc::now()),
            Err(ReportError::AlreadySubmitted)
        ));
    }

    #[test]
    fn test_admin_reopens_submitted_report() {
        let change = ReportLifecycle::reopen(ReportStatus::Submitted, UserRole::Admin).unwrap();
        assert_eq!(change.status(), ReportStatus::Reopened);
        assert_eq!(change.submitted_at(), None);
    }

    #[rstest]
    #[case(UserRole::Staff)]
    #[case(UserRole::OrgUser)]
    fn test_reopen_requires_admin(#[case] role: UserRole) {
        assert!(matches!(
            ReportLifecycle::reopen(ReportStatus::Submitted, role),
            Err(ReportError::Forbidden)
        ));
    }

    #[rstest]
    #[case(ReportStatus::NotStarted)]
    #[case(ReportStatus::Draft)]
    #[case(ReportStatus::Reopened)]
    fn test_reopen_requires_submitted(#[case] from: ReportStatus) {
        assert!(matches!(
            ReportLifecycle::reopen(from, UserRole::Admin),
            Err(ReportError::NotSubmitted { status }) if status == from
        ));
    }

    #[rstest]
    #[case(ReportStatus::Submitted, true, true)]
    #[case(ReportStatus::Submitted, false, false)]
    #[case(ReportStatus::Draft, false, true)]
    #[case(ReportStatus::Draft, true, false)]
    #[case(ReportStatus::Reopened, true, false)]
    fn test_verify(#[case] status: ReportStatus, #[case] has_ts: bool, #[case] ok: bool) {
        let submitted_at = has_ts.then(Utc::now);
        assert_eq!(ReportLifecycle::verify(status, submitted_at).is_ok(), ok);
    }
}
