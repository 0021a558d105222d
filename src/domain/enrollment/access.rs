//! Access policy for paid lecture content.

use crate::domain::foundation::AuthenticatedUser;

use super::Enrollment;

/// How strictly enrollment rows gate paid content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessRule {
    /// Only `granted` and `active` rows open paid lectures.
    RequireGrantingStatus,
    /// Any row opens paid lectures, including `revoked`.
    RowExists,
}

impl AccessRule {
    pub fn from_requires_active_status(requires_active: bool) -> Self {
        if requires_active {
            AccessRule::RequireGrantingStatus
        } else {
            AccessRule::RowExists
        }
    }
}

/// Why access was given or refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    FreeLecture,
    Admin,
    Enrolled,
    NotEnrolled,
    Revoked,
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(
            self,
            AccessDecision::FreeLecture | AccessDecision::Admin | AccessDecision::Enrolled
        )
    }

    /// Whether the decision needed the enrollment row.
    pub fn needs_enrollment(user: &AuthenticatedUser, lecture_is_free: bool) -> bool {
        !lecture_is_free && !user.is_admin()
    }

    /// Decides access for `user` given the (user, course) row, if any.
    pub fn evaluate(
        user: &AuthenticatedUser,
        lecture_is_free: bool,
        enrollment: Option<&Enrollment>,
        rule: AccessRule,
    ) -> Self {
        if lecture_is_free {
            return AccessDecision::FreeLecture;
        }
        if user.is_admin() {
            return AccessDecision::Admin;
        }
        match (enrollment, rule) {
            (None, _) => AccessDecision::NotEnrolled,
            (Some(_), AccessRule::RowExists) => AccessDecision::Enrolled,
            (Some(e), AccessRule::RequireGrantingStatus) if e.has_access() => {
                AccessDecision::Enrolled
            }
            (Some(_), AccessRule::RequireGrantingStatus) => AccessDecision::Revoked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{CourseId, EnrollmentId, Timestamp, UserId, UserRole};

    fn user(role: UserRole) -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new("user-1").unwrap(), "s@example.com", None, role)
    }

    fn granted() -> Enrollment {
        Enrollment::from_grant(
            EnrollmentId::new(),
            UserId::new("user-1").unwrap(),
            CourseId::new("course-1").unwrap(),
            Timestamp::now(),
        )
    }

    fn revoked() -> Enrollment {
        let mut e = granted();
        e.revoke(Timestamp::now()).unwrap();
        e
    }

    const STRICT: AccessRule = AccessRule::RequireGrantingStatus;
    const LEGACY: AccessRule = AccessRule::RowExists;

    #[test]
    fn free_lecture_needs_no_enrollment() {
        let d = AccessDecision::evaluate(&user(UserRole::Student), true, None, STRICT);
        assert_eq!(d, AccessDecision::FreeLecture);
        assert!(d.is_allowed());
        assert!(!AccessDecision::needs_enrollment(&user(UserRole::Student), true));
    }

    #[test]
    fn paid_lecture_without_enrollment_is_denied() {
        let d = AccessDecision::evaluate(&user(UserRole::Student), false, None, STRICT);
        assert_eq!(d, AccessDecision::NotEnrolled);
        assert!(!d.is_allowed());
    }

    #[test]
    fn paid_lecture_with_enrollment_is_allowed() {
        let e = granted();
        let d = AccessDecision::evaluate(&user(UserRole::Student), false, Some(&e), STRICT);
        assert_eq!(d, AccessDecision::Enrolled);
    }

    #[test]
    fn admin_bypasses_enrollment() {
        let d = AccessDecision::evaluate(&user(UserRole::Admin), false, None, STRICT);
        assert_eq!(d, AccessDecision::Admin);
        assert!(!AccessDecision::needs_enrollment(&user(UserRole::Admin), false));
    }

    #[test]
    fn revoked_enrollment_is_denied_under_strict_rule() {
        let e = revoked();
        let d = AccessDecision::evaluate(&user(UserRole::Student), false, Some(&e), STRICT);
        assert_eq!(d, AccessDecision::Revoked);
        assert!(!d.is_allowed());
    }

    #[test]
    fn revoked_enrollment_is_allowed_under_row_exists_rule() {
        let e = revoked();
        let d = AccessDecision::evaluate(&user(UserRole::Student), false, Some(&e), LEGACY);
        assert_eq!(d, AccessDecision::Enrolled);
    }

    #[test]
    fn rule_from_flag() {
        assert_eq!(AccessRule::from_requires_active_status(true), STRICT);
        assert_eq!(AccessRule::from_requires_active_status(false), LEGACY);
    }
}
