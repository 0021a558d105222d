//! ListMyEnrollmentsHandler - Query handler for a student's enrollments.

use std::sync::Arc;

use futures::future::try_join_all;

use crate::domain::catalog::{Course, LectureProgress};
use crate::domain::enrollment::{Enrollment, EnrollmentError};
use crate::domain::foundation::UserId;
use crate::ports::{CourseCatalog, EnrollmentRepository};

/// Query for the caller's enrollments.
#[derive(Debug, Clone)]
pub struct ListMyEnrollmentsQuery {
    pub user_id: UserId,
}

/// One enrollment with its course and progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentSummary {
    pub enrollment: Enrollment,
    /// None if the course has since been removed from the catalog.
    pub course: Option<Course>,
    pub progress: LectureProgress,
}

pub struct ListMyEnrollmentsHandler {
    repository: Arc<dyn EnrollmentRepository>,
    catalog: Arc<dyn CourseCatalog>,
}

impl ListMyEnrollmentsHandler {
    pub fn new(repository: Arc<dyn EnrollmentRepository>, catalog: Arc<dyn CourseCatalog>) -> Self {
        Self { repository, catalog }
    }

    pub async fn handle(
        &self,
        query: ListMyEnrollmentsQuery,
    ) -> Result<Vec<EnrollmentSummary>, EnrollmentError> {
        let enrollments = self.repository.list_for_user(&query.user_id).await?;

        let summaries = try_join_all(enrollments.into_iter().map(|enrollment| {
            let user_id = query.user_id.clone();
            async move {
                let course = self.catalog.get_course(&enrollment.course_id).await?;
                let progress = self
                    .catalog
                    .lecture_progress(&user_id, &enrollment.course_id)
                    .await?;
                Ok::<_, EnrollmentError>(EnrollmentSummary {
                    enrollment,
                    course,
                    progress,
                })
            }
        }))
        .await?;

        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryCourseCatalog, InMemoryEnrollmentRepository};
    use crate::domain::catalog::Lecture;
    use crate::domain::foundation::{CourseId, EnrollmentId, LectureId, Money, Timestamp};

    fn user_id() -> UserId {
        UserId::new("user-1").unwrap()
    }

    fn course_id() -> CourseId {
        CourseId::new("course-1").unwrap()
    }

    fn lecture(id: &str) -> Lecture {
        Lecture {
            id: LectureId::new(id).unwrap(),
            course_id: course_id(),
            title: id.to_string(),
            is_free: false,
        }
    }

    #[tokio::test]
    async fn includes_course_and_progress() {
        let repository = InMemoryEnrollmentRepository::new().with_enrollment(Enrollment::from_grant(
            EnrollmentId::new(),
            user_id(),
            course_id(),
            Timestamp::now(),
        ));
        let catalog = InMemoryCourseCatalog::new()
            .with_course(Course {
                id: course_id(),
                title: "Ethics".to_string(),
                price: Money::from_major(999).unwrap(),
                is_published: true,
            })
            .with_lecture(lecture("l1"))
            .with_lecture(lecture("l2"))
            .with_lecture(lecture("l3"))
            .with_completed(user_id(), LectureId::new("l1").unwrap());

        let handler = ListMyEnrollmentsHandler::new(Arc::new(repository), Arc::new(catalog));
        let summaries = handler
            .handle(ListMyEnrollmentsQuery { user_id: user_id() })
            .await
            .unwrap();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].course.as_ref().unwrap().title, "Ethics");
        assert_eq!(summaries[0].progress.total_lectures, 3);
        assert_eq!(summaries[0].progress.completed_lectures, 1);
        assert_eq!(summaries[0].progress.percentage(), 33);
    }

    #[tokio::test]
    async fn empty_for_user_without_enrollments() {
        let handler = ListMyEnrollmentsHandler::new(
            Arc::new(InMemoryEnrollmentRepository::new()),
            Arc::new(InMemoryCourseCatalog::new()),
        );
        let summaries = handler
            .handle(ListMyEnrollmentsQuery { user_id: user_id() })
            .await
            .unwrap();
        assert!(summaries.is_empty());
    }
}
