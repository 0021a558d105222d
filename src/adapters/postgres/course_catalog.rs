//! PostgreSQL implementation of CourseCatalog.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::catalog::{Course, Lecture, LectureProgress};
use crate::domain::foundation::{
    CourseId, DomainError, ErrorCode, LectureId, Money, UserId,
};
use crate::ports::CourseCatalog;

pub struct PostgresCourseCatalog {
    pool: PgPool,
}

impl PostgresCourseCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CourseRow {
    id: String,
    title: String,
    price_minor: i64,
    is_published: bool,
}

impl TryFrom<CourseRow> for Course {
    type Error = DomainError;

    fn try_from(row: CourseRow) -> Result<Self, Self::Error> {
        Ok(Course {
            id: CourseId::new(row.id).map_err(corrupt)?,
            title: row.title,
            price: Money::from_minor(row.price_minor).map_err(corrupt)?,
            is_published: row.is_published,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LectureRow {
    id: String,
    course_id: String,
    title: String,
    is_free: bool,
}

impl TryFrom<LectureRow> for Lecture {
    type Error = DomainError;

    fn try_from(row: LectureRow) -> Result<Self, Self::Error> {
        Ok(Lecture {
            id: LectureId::new(row.id).map_err(corrupt)?,
            course_id: CourseId::new(row.course_id).map_err(corrupt)?,
            title: row.title,
            is_free: row.is_free,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProgressRow {
    total: i64,
    completed: i64,
}

fn corrupt(e: impl std::fmt::Display) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("Invalid catalog row: {}", e))
}

#[async_trait]
impl CourseCatalog for PostgresCourseCatalog {
    async fn get_course(&self, course_id: &CourseId) -> Result<Option<Course>, DomainError> {
        let row: Option<CourseRow> = sqlx::query_as(
            "SELECT id, title, price_minor, is_published FROM courses WHERE id = $1",
        )
        .bind(course_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to find course: {}", e)))?;

        row.map(Course::try_from).transpose()
    }

    async fn get_lecture(&self, lecture_id: &LectureId) -> Result<Option<Lecture>, DomainError> {
        let row: Option<LectureRow> = sqlx::query_as(
            "SELECT id, course_id, title, is_free FROM lectures WHERE id = $1",
        )
        .bind(lecture_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to find lecture: {}", e)))?;

        row.map(Lecture::try_from).transpose()
    }

    async fn lecture_progress(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<LectureProgress, DomainError> {
        let row: ProgressRow = sqlx::query_as(
            r#"
            SELECT COUNT(l.id) AS total,
                   COUNT(lp.lecture_id) FILTER (WHERE lp.completed) AS completed
            FROM lectures l
            LEFT JOIN lecture_progress lp
                   ON lp.lecture_id = l.id AND lp.user_id = $1
            WHERE l.course_id = $2
            "#,
        )
        .bind(user_id.as_str())
        .bind(course_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to load progress: {}", e)))?;

        Ok(LectureProgress {
            total_lectures: u32::try_from(row.total).map_err(corrupt)?,
            completed_lectures: u32::try_from(row.completed).map_err(corrupt)?,
        })
    }
}
