//! In-memory implementation of EnrollmentRepository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::domain::enrollment::{Enrollment, EnrollmentWrite, WriteResolution};
use crate::domain::foundation::{CourseId, DomainError, EnrollmentId, ErrorCode, Timestamp, UserId};
use crate::ports::{EnrollmentRepository, UpsertOutcome};

type Key = (UserId, CourseId);

/// Enrollment rows keyed by (user, course).
#[derive(Default)]
pub struct InMemoryEnrollmentRepository {
    rows: Mutex<HashMap<Key, Enrollment>>,
    fail_writes: AtomicBool,
}

impl InMemoryEnrollmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a row directly, bypassing merge rules.
    pub fn with_enrollment(self, enrollment: Enrollment) -> Self {
        if let Ok(mut rows) = self.rows.lock() {
            rows.insert(
                (enrollment.user_id.clone(), enrollment.course_id.clone()),
                enrollment,
            );
        }
        self
    }

    /// Makes every subsequent `upsert` fail with a database error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.rows.lock().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned() -> DomainError {
        DomainError::new(ErrorCode::InternalError, "enrollment store lock poisoned")
    }
}

#[async_trait]
impl EnrollmentRepository for InMemoryEnrollmentRepository {
    async fn upsert(&self, write: EnrollmentWrite) -> Result<UpsertOutcome, DomainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::database("simulated write failure"));
        }

        let (user_id, course_id) = write.key();
        let key = (user_id.clone(), course_id.clone());

        // Resolve and store under one lock; this is the atomic upsert.
        let mut rows = self.rows.lock().map_err(|_| Self::poisoned())?;
        let resolution =
            Enrollment::resolve(rows.get(&key), &write, EnrollmentId::new(), Timestamp::now())?;

        let outcome = match resolution {
            WriteResolution::Insert(enrollment) => {
                rows.insert(key, enrollment.clone());
                UpsertOutcome::Created(enrollment)
            }
            WriteResolution::Update(enrollment) => {
                rows.insert(key, enrollment.clone());
                UpsertOutcome::Updated(enrollment)
            }
            WriteResolution::Keep => match rows.get(&key) {
                Some(existing) => UpsertOutcome::Unchanged(existing.clone()),
                None => UpsertOutcome::Missing,
            },
            WriteResolution::Skip => UpsertOutcome::Missing,
        };
        Ok(outcome)
    }

    async fn find(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Option<Enrollment>, DomainError> {
        let rows = self.rows.lock().map_err(|_| Self::poisoned())?;
        Ok(rows.get(&(user_id.clone(), course_id.clone())).cloned())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Enrollment>, DomainError> {
        let rows = self.rows.lock().map_err(|_| Self::poisoned())?;
        let mut enrollments: Vec<Enrollment> = rows
            .values()
            .filter(|e| &e.user_id == user_id)
            .cloned()
            .collect();
        enrollments.sort_by(|a, b| b.enrolled_at.cmp(&a.enrolled_at));
        Ok(enrollments)
    }
}
