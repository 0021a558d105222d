//! Enrollment repository port.
//!
//! # Atomicity
//!
//! `upsert` is the only way to change an enrollment row. Implementations
//! must apply [`Enrollment::resolve`] as one atomic operation keyed on the
//! (user, course) uniqueness constraint: a native `INSERT ... ON CONFLICT`
//! in SQL, a single critical section in memory. Never a lookup followed by
//! a separate insert.

use async_trait::async_trait;

use crate::domain::enrollment::{Enrollment, EnrollmentWrite};
use crate::domain::foundation::{CourseId, DomainError, UserId};

/// Result of applying an [`EnrollmentWrite`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No row existed; this one was inserted.
    Created(Enrollment),
    /// The existing row was changed to this.
    Updated(Enrollment),
    /// The existing row already satisfied the write.
    Unchanged(Enrollment),
    /// No row exists and the write does not create one (revoke).
    Missing,
}

impl UpsertOutcome {
    /// The row after the write, if one exists.
    pub fn enrollment(&self) -> Option<&Enrollment> {
        match self {
            UpsertOutcome::Created(e) | UpsertOutcome::Updated(e) | UpsertOutcome::Unchanged(e) => {
                Some(e)
            }
            UpsertOutcome::Missing => None,
        }
    }

    /// Consumes the outcome, returning the row if one exists.
    pub fn into_enrollment(self) -> Option<Enrollment> {
        match self {
            UpsertOutcome::Created(e) | UpsertOutcome::Updated(e) | UpsertOutcome::Unchanged(e) => {
                Some(e)
            }
            UpsertOutcome::Missing => None,
        }
    }

    /// True if this write left the row paid and accessible where it was not before.
    ///
    /// Decides whether a purchase confirmation is due, so redelivered
    /// confirmations for an already-paid row do not send mail again.
    pub fn became_paid(&self) -> bool {
        match self {
            UpsertOutcome::Created(e) | UpsertOutcome::Updated(e) => e.is_paid() && e.has_access(),
            UpsertOutcome::Unchanged(_) | UpsertOutcome::Missing => false,
        }
    }
}

/// Persistence for enrollment rows.
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Atomically applies `write` to the (user, course) row.
    async fn upsert(&self, write: EnrollmentWrite) -> Result<UpsertOutcome, DomainError>;

    /// Finds the row for (user, course).
    async fn find(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Option<Enrollment>, DomainError>;

    /// Lists a user's enrollments, newest first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Enrollment>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{EnrollmentId, Money, Timestamp};

    fn granted() -> Enrollment {
        Enrollment::from_grant(
            EnrollmentId::new(),
            UserId::new("user-1").unwrap(),
            CourseId::new("course-1").unwrap(),
            Timestamp::now(),
        )
    }

    fn paid() -> Enrollment {
        let mut e = granted();
        e.provider_payment_id = Some("pay_1".to_string());
        e.amount_paid = Money::from_minor(100).unwrap();
        e.status = crate::domain::enrollment::EnrollmentStatus::Active;
        e
    }

    #[test]
    fn enrollment_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn EnrollmentRepository) {}
    }

    #[test]
    fn created_paid_row_became_paid() {
        assert!(UpsertOutcome::Created(paid()).became_paid());
        assert!(UpsertOutcome::Updated(paid()).became_paid());
    }

    #[test]
    fn unchanged_or_free_rows_did_not_become_paid() {
        assert!(!UpsertOutcome::Unchanged(paid()).became_paid());
        assert!(!UpsertOutcome::Created(granted()).became_paid());
        assert!(!UpsertOutcome::Missing.became_paid());
    }

    #[test]
    fn missing_has_no_enrollment() {
        assert!(UpsertOutcome::Missing.enrollment().is_none());
        assert!(UpsertOutcome::Unchanged(granted()).into_enrollment().is_some());
    }
}
