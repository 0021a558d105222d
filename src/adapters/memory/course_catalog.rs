//! In-memory implementation of CourseCatalog.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use crate::domain::catalog::{Course, Lecture, LectureProgress};
use crate::domain::foundation::{CourseId, DomainError, ErrorCode, LectureId, UserId};
use crate::ports::CourseCatalog;

#[derive(Default)]
pub struct InMemoryCourseCatalog {
    courses: RwLock<HashMap<CourseId, Course>>,
    lectures: RwLock<HashMap<LectureId, Lecture>>,
    completed: RwLock<HashSet<(UserId, LectureId)>>,
}

impl InMemoryCourseCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_course(self, course: Course) -> Self {
        if let Ok(mut courses) = self.courses.write() {
            courses.insert(course.id.clone(), course);
        }
        self
    }

    pub fn with_lecture(self, lecture: Lecture) -> Self {
        if let Ok(mut lectures) = self.lectures.write() {
            lectures.insert(lecture.id.clone(), lecture);
        }
        self
    }

    /// Records that `user_id` finished `lecture_id`.
    pub fn with_completed(self, user_id: UserId, lecture_id: LectureId) -> Self {
        if let Ok(mut completed) = self.completed.write() {
            completed.insert((user_id, lecture_id));
        }
        self
    }

    fn poisoned() -> DomainError {
        DomainError::new(ErrorCode::InternalError, "course catalog lock poisoned")
    }
}

#[async_trait]
impl CourseCatalog for InMemoryCourseCatalog {
    async fn get_course(&self, course_id: &CourseId) -> Result<Option<Course>, DomainError> {
        let courses = self.courses.read().map_err(|_| Self::poisoned())?;
        Ok(courses.get(course_id).cloned())
    }

    async fn get_lecture(&self, lecture_id: &LectureId) -> Result<Option<Lecture>, DomainError> {
        let lectures = self.lectures.read().map_err(|_| Self::poisoned())?;
        Ok(lectures.get(lecture_id).cloned())
    }

    async fn lecture_progress(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<LectureProgress, DomainError> {
        let lectures = self.lectures.read().map_err(|_| Self::poisoned())?;
        let completed = self.completed.read().map_err(|_| Self::poisoned())?;

        let in_course: Vec<&Lecture> = lectures
            .values()
            .filter(|l| &l.course_id == course_id)
            .collect();
        let done = in_course
            .iter()
            .filter(|l| completed.contains(&(user_id.clone(), l.id.clone())))
            .count();

        Ok(LectureProgress {
            total_lectures: in_course.len() as u32,
            completed_lectures: done as u32,
        })
    }
}
