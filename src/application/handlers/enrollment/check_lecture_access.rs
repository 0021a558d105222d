//! Access Guard and the lecture access query.

use std::sync::Arc;

use crate::domain::enrollment::{AccessDecision, AccessRule, EnrollmentError};
use crate::domain::foundation::{AuthenticatedUser, CourseId, LectureId};
use crate::ports::{CourseCatalog, EnrollmentRepository};

/// Read-side check deciding whether a user may open paid lecture content.
pub struct AccessGuard {
    repository: Arc<dyn EnrollmentRepository>,
    rule: AccessRule,
}

impl AccessGuard {
    pub fn new(repository: Arc<dyn EnrollmentRepository>, rule: AccessRule) -> Self {
        Self { repository, rule }
    }

    /// Decides access; the enrollment is only looked up when it matters.
    pub async fn decide(
        &self,
        user: &AuthenticatedUser,
        course_id: &CourseId,
        lecture_is_free: bool,
    ) -> Result<AccessDecision, EnrollmentError> {
        let enrollment = if AccessDecision::needs_enrollment(user, lecture_is_free) {
            self.repository.find(&user.id, course_id).await?
        } else {
            None
        };
        Ok(AccessDecision::evaluate(
            user,
            lecture_is_free,
            enrollment.as_ref(),
            self.rule,
        ))
    }

    pub async fn can_access(
        &self,
        user: &AuthenticatedUser,
        course_id: &CourseId,
        lecture_is_free: bool,
    ) -> Result<bool, EnrollmentError> {
        Ok(self.decide(user, course_id, lecture_is_free).await?.is_allowed())
    }
}

/// Query for access to one lecture.
#[derive(Debug, Clone)]
pub struct CheckLectureAccessQuery {
    pub user: AuthenticatedUser,
    pub lecture_id: LectureId,
}

/// Access granted to a lecture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LectureAccess {
    pub lecture_id: LectureId,
    pub course_id: CourseId,
    pub decision: AccessDecision,
}

/// Handler resolving a lecture to its course and applying the guard.
pub struct CheckLectureAccessHandler {
    catalog: Arc<dyn CourseCatalog>,
    guard: Arc<AccessGuard>,
}

impl CheckLectureAccessHandler {
    pub fn new(catalog: Arc<dyn CourseCatalog>, guard: Arc<AccessGuard>) -> Self {
        Self { catalog, guard }
    }

    pub async fn handle(&self, query: CheckLectureAccessQuery) -> Result<LectureAccess, EnrollmentError> {
        let lecture = self
            .catalog
            .get_lecture(&query.lecture_id)
            .await?
            .ok_or_else(|| EnrollmentError::LectureNotFound(query.lecture_id.clone()))?;

        let decision = self
            .guard
            .decide(&query.user, &lecture.course_id, lecture.is_free)
            .await?;

        if !decision.is_allowed() {
            tracing::debug!(
                user_id = %query.user.id,
                lecture_id = %lecture.id,
                ?decision,
                "Lecture access denied"
            );
            return Err(EnrollmentError::AccessDenied(lecture.id));
        }

        Ok(LectureAccess {
            lecture_id: lecture.id,
            course_id: lecture.course_id,
            decision,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryCourseCatalog, InMemoryEnrollmentRepository};
    use crate::domain::catalog::Lecture;
    use crate::domain::enrollment::Enrollment;
    use crate::domain::foundation::{EnrollmentId, ErrorCode, Timestamp, UserId, UserRole};

    fn user(role: UserRole) -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new("user-1").unwrap(), "s@example.com", None, role)
    }

    fn course_id() -> CourseId {
        CourseId::new("course-1").unwrap()
    }

    fn enrollment(revoked: bool) -> Enrollment {
        let mut e = Enrollment::from_grant(
            EnrollmentId::new(),
            UserId::new("user-1").unwrap(),
            course_id(),
            Timestamp::now(),
        );
        if revoked {
            e.revoke(Timestamp::now()).unwrap();
        }
        e
    }

    fn guard(repository: InMemoryEnrollmentRepository, rule: AccessRule) -> AccessGuard {
        AccessGuard::new(Arc::new(repository), rule)
    }

    #[tokio::test]
    async fn free_lecture_is_open_without_enrollment() {
        let g = guard(InMemoryEnrollmentRepository::new(), AccessRule::RequireGrantingStatus);
        let decision = g.decide(&user(UserRole::Student), &course_id(), true).await.unwrap();
        assert_eq!(decision, AccessDecision::FreeLecture);
    }

    #[tokio::test]
    async fn admin_is_always_allowed() {
        let g = guard(InMemoryEnrollmentRepository::new(), AccessRule::RequireGrantingStatus);
        assert!(g.can_access(&user(UserRole::Admin), &course_id(), false).await.unwrap());
    }

    #[tokio::test]
    async fn student_needs_enrollment() {
        let g = guard(InMemoryEnrollmentRepository::new(), AccessRule::RequireGrantingStatus);
        assert!(!g.can_access(&user(UserRole::Student), &course_id(), false).await.unwrap());

        let g = guard(
            InMemoryEnrollmentRepository::new().with_enrollment(enrollment(false)),
            AccessRule::RequireGrantingStatus,
        );
        assert!(g.can_access(&user(UserRole::Student), &course_id(), false).await.unwrap());
    }

    #[tokio::test]
    async fn revoked_is_denied_under_strict_rule() {
        let g = guard(
            InMemoryEnrollmentRepository::new().with_enrollment(enrollment(true)),
            AccessRule::RequireGrantingStatus,
        );
        let decision = g.decide(&user(UserRole::Student), &course_id(), false).await.unwrap();
        assert_eq!(decision, AccessDecision::Revoked);
    }

    #[tokio::test]
    async fn revoked_is_allowed_under_row_exists_rule() {
        let g = guard(
            InMemoryEnrollmentRepository::new().with_enrollment(enrollment(true)),
            AccessRule::RowExists,
        );
        assert!(g.can_access(&user(UserRole::Student), &course_id(), false).await.unwrap());
    }

    fn handler(repository: InMemoryEnrollmentRepository) -> CheckLectureAccessHandler {
        let catalog = InMemoryCourseCatalog::new()
            .with_lecture(Lecture {
                id: LectureId::new("intro").unwrap(),
                course_id: course_id(),
                title: "Introduction".to_string(),
                is_free: true,
            })
            .with_lecture(Lecture {
                id: LectureId::new("deep-dive").unwrap(),
                course_id: course_id(),
                title: "Deep dive".to_string(),
                is_free: false,
            });
        CheckLectureAccessHandler::new(
            Arc::new(catalog),
            Arc::new(guard(repository, AccessRule::RequireGrantingStatus)),
        )
    }

    fn query(lecture: &str) -> CheckLectureAccessQuery {
        CheckLectureAccessQuery {
            user: user(UserRole::Student),
            lecture_id: LectureId::new(lecture).unwrap(),
        }
    }

    #[tokio::test]
    async fn handler_resolves_course_from_lecture() {
        let h = handler(InMemoryEnrollmentRepository::new().with_enrollment(enrollment(false)));
        let access = h.handle(query("deep-dive")).await.unwrap();
        assert_eq!(access.course_id, course_id());
        assert_eq!(access.decision, AccessDecision::Enrolled);
    }

    #[tokio::test]
    async fn handler_denies_paid_lecture_without_enrollment() {
        let h = handler(InMemoryEnrollmentRepository::new());
        let err = h.handle(query("deep-dive")).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::AccessDenied);

        assert!(h.handle(query("intro")).await.is_ok());
    }

    #[tokio::test]
    async fn handler_reports_unknown_lecture() {
        let h = handler(InMemoryEnrollmentRepository::new());
        let err = h.handle(query("missing")).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::LectureNotFound);
    }
}
