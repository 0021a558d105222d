//! Catalog read models.
//!
//! Courses and lectures are maintained by the admin workflow. This service
//! only reads them: the course price is the authoritative amount charged and
//! a lecture's free flag decides whether enrollment is checked at all.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CourseId, LectureId, Money};

/// A purchasable course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub price: Money,
    pub is_published: bool,
}

impl Course {
    /// Reason the course cannot be bought, if any.
    pub fn purchase_blocker(&self) -> Option<&'static str> {
        if !self.is_published {
            return Some("course is not published");
        }
        if !self.price.is_positive() {
            return Some("course is free");
        }
        None
    }
}

/// A lecture within a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lecture {
    pub id: LectureId,
    pub course_id: CourseId,
    pub title: String,
    pub is_free: bool,
}

/// Completion counts for one student in one course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LectureProgress {
    pub total_lectures: u32,
    pub completed_lectures: u32,
}

impl LectureProgress {
    /// Whole-number completion percentage, 0 when the course has no lectures.
    pub fn percentage(&self) -> u32 {
        if self.total_lectures == 0 {
            return 0;
        }
        let completed = self.completed_lectures.min(self.total_lectures) as f64;
        (completed / self.total_lectures as f64 * 100.0).round() as u32
    }
}
