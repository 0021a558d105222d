//! Course catalog port.
//!
//! Read-only view of courses, lectures and lecture completion maintained by
//! the admin and progress workflows.

use async_trait::async_trait;

use crate::domain::catalog::{Course, Lecture, LectureProgress};
use crate::domain::foundation::{CourseId, DomainError, LectureId, UserId};

#[async_trait]
pub trait CourseCatalog: Send + Sync {
    /// Finds a course by id.
    async fn get_course(&self, course_id: &CourseId) -> Result<Option<Course>, DomainError>;

    /// Finds a lecture by id.
    async fn get_lecture(&self, lecture_id: &LectureId) -> Result<Option<Lecture>, DomainError>;

    /// Counts lectures in the course and how many the user completed.
    async fn lecture_progress(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<LectureProgress, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_catalog_is_object_safe() {
        fn _accepts_dyn(_catalog: &dyn CourseCatalog) {}
    }
}
