//! Administrator grant and revoke handlers.
//!
//! Both go through the same atomic upsert as payments. A grant never touches
//! payment fields; restoring a revoked paid row makes it active again.

use std::sync::Arc;

use crate::domain::enrollment::{Enrollment, EnrollmentError, EnrollmentWrite};
use crate::domain::foundation::{AuthenticatedUser, CourseId, UserId};
use crate::ports::{CourseCatalog, EnrollmentRepository, UpsertOutcome};

/// Command to grant or revoke a student's access.
#[derive(Debug, Clone)]
pub struct ManageAccessCommand {
    pub actor: AuthenticatedUser,
    pub user_id: UserId,
    pub course_id: CourseId,
}

/// Result of an access change.
#[derive(Debug, Clone)]
pub struct ManageAccessResult {
    pub enrollment: Enrollment,
    /// False when the row already had the requested status.
    pub changed: bool,
}

fn require_admin(actor: &AuthenticatedUser) -> Result<(), EnrollmentError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(EnrollmentError::Forbidden)
    }
}

fn into_result(outcome: UpsertOutcome, cmd: &ManageAccessCommand) -> Result<ManageAccessResult, EnrollmentError> {
    let changed = matches!(outcome, UpsertOutcome::Created(_) | UpsertOutcome::Updated(_));
    let enrollment = outcome
        .into_enrollment()
        .ok_or_else(|| EnrollmentError::EnrollmentNotFound {
            user_id: cmd.user_id.clone(),
            course_id: cmd.course_id.clone(),
        })?;
    Ok(ManageAccessResult { enrollment, changed })
}

/// Handler for admin grants.
pub struct GrantAccessHandler {
    catalog: Arc<dyn CourseCatalog>,
    repository: Arc<dyn EnrollmentRepository>,
}

impl GrantAccessHandler {
    pub fn new(catalog: Arc<dyn CourseCatalog>, repository: Arc<dyn EnrollmentRepository>) -> Self {
        Self { catalog, repository }
    }

    pub async fn handle(&self, cmd: ManageAccessCommand) -> Result<ManageAccessResult, EnrollmentError> {
        require_admin(&cmd.actor)?;

        if self.catalog.get_course(&cmd.course_id).await?.is_none() {
            return Err(EnrollmentError::course_not_found(cmd.course_id));
        }

        let outcome = self
            .repository
            .upsert(EnrollmentWrite::Grant {
                user_id: cmd.user_id.clone(),
                course_id: cmd.course_id.clone(),
            })
            .await?;
        let result = into_result(outcome, &cmd)?;

        tracing::info!(
            admin_id = %cmd.actor.id,
            user_id = %cmd.user_id,
            course_id = %cmd.course_id,
            status = %result.enrollment.status,
            changed = result.changed,
            "Course access granted"
        );
        Ok(result)
    }
}

/// Handler for admin revocations.
pub struct RevokeAccessHandler {
    repository: Arc<dyn EnrollmentRepository>,
}

impl RevokeAccessHandler {
    pub fn new(repository: Arc<dyn EnrollmentRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: ManageAccessCommand) -> Result<ManageAccessResult, EnrollmentError> {
        require_admin(&cmd.actor)?;

        let outcome = self
            .repository
            .upsert(EnrollmentWrite::Revoke {
                user_id: cmd.user_id.clone(),
                course_id: cmd.course_id.clone(),
            })
            .await?;
        let result = into_result(outcome, &cmd)?;

        tracing::info!(
            admin_id = %cmd.actor.id,
            user_id = %cmd.user_id,
            course_id = %cmd.course_id,
            changed = result.changed,
            "Course access revoked"
        );
        Ok(result)
    }
}
