//! PostgreSQL implementation of EnrollmentRepository.
//!
//! Every write is a single statement keyed on the
//! `enrollments_user_course_key` unique constraint. The SQL mirrors
//! [`Enrollment::resolve`]: the `DO UPDATE ... WHERE` clause only fires when
//! the row actually needs to change, and a missing `RETURNING` row means the
//! existing enrollment already satisfied the write.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::enrollment::{Enrollment, EnrollmentStatus, EnrollmentWrite, PaymentConfirmation};
use crate::domain::foundation::{
    CourseId, DomainError, EnrollmentId, ErrorCode, Money, Timestamp, UserId,
};
use crate::ports::{EnrollmentRepository, UpsertOutcome};

/// PostgreSQL implementation of the EnrollmentRepository port.
pub struct PostgresEnrollmentRepository {
    pool: PgPool,
}

impl PostgresEnrollmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of an enrollment.
#[derive(Debug, sqlx::FromRow)]
struct EnrollmentRow {
    id: Uuid,
    user_id: String,
    course_id: String,
    provider_order_id: Option<String>,
    provider_payment_id: Option<String>,
    amount_paid_minor: i64,
    status: String,
    enrolled_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Row returned by an upsert, with whether it was freshly inserted.
#[derive(Debug, sqlx::FromRow)]
struct UpsertedRow {
    #[sqlx(flatten)]
    enrollment: EnrollmentRow,
    inserted: bool,
}

impl TryFrom<EnrollmentRow> for Enrollment {
    type Error = DomainError;

    fn try_from(row: EnrollmentRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<EnrollmentStatus>().map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid status value: {}", e))
        })?;

        Ok(Enrollment {
            id: EnrollmentId::from_uuid(row.id),
            user_id: UserId::new(row.user_id).map_err(corrupt)?,
            course_id: CourseId::new(row.course_id).map_err(corrupt)?,
            provider_order_id: row.provider_order_id,
            provider_payment_id: row.provider_payment_id,
            amount_paid: Money::from_minor(row.amount_paid_minor).map_err(corrupt)?,
            status,
            enrolled_at: Timestamp::from_datetime(row.enrolled_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn corrupt(e: impl std::fmt::Display) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("Invalid enrollment row: {}", e))
}

fn db_error(action: &str, e: sqlx::Error) -> DomainError {
    DomainError::database(format!("Failed to {}: {}", action, e))
}

const RETURNING: &str = r#"
    RETURNING id, user_id, course_id, provider_order_id, provider_payment_id,
              amount_paid_minor, status, enrolled_at, updated_at, (xmax = 0) AS inserted
"#;

/// Row already carries a recorded payment.
const IS_PAID: &str = "(e.amount_paid_minor > 0 AND e.provider_payment_id IS NOT NULL)";

impl PostgresEnrollmentRepository {
    async fn upsert_payment(
        &self,
        confirmation: &PaymentConfirmation,
        reactivate_revoked: bool,
    ) -> Result<Option<UpsertedRow>, DomainError> {
        let sql = format!(
            r#"
            INSERT INTO enrollments AS e (
                id, user_id, course_id, provider_order_id, provider_payment_id,
                amount_paid_minor, status, enrolled_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, 'active', $7, $7)
            ON CONFLICT ON CONSTRAINT enrollments_user_course_key DO UPDATE SET
                provider_order_id = CASE WHEN {paid} THEN e.provider_order_id
                    ELSE COALESCE(EXCLUDED.provider_order_id, e.provider_order_id) END,
                provider_payment_id = CASE WHEN {paid} THEN e.provider_payment_id
                    ELSE EXCLUDED.provider_payment_id END,
                amount_paid_minor = CASE WHEN {paid} THEN e.amount_paid_minor
                    ELSE EXCLUDED.amount_paid_minor END,
                status = 'active',
                updated_at = EXCLUDED.updated_at
            WHERE (e.status <> 'revoked' OR $8)
              AND NOT (e.status = 'active' AND {paid})
            {returning}
            "#,
            paid = IS_PAID,
            returning = RETURNING,
        );

        sqlx::query_as::<_, UpsertedRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(confirmation.user_id.as_str())
            .bind(confirmation.course_id.as_str())
            .bind(&confirmation.order_id)
            .bind(&confirmation.payment_id)
            .bind(confirmation.amount.minor_units())
            .bind(Utc::now())
            .bind(reactivate_revoked)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("record payment", e))
    }

    async fn upsert_grant(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Option<UpsertedRow>, DomainError> {
        let sql = format!(
            r#"
            INSERT INTO enrollments AS e (
                id, user_id, course_id, amount_paid_minor, status, enrolled_at, updated_at
            ) VALUES ($1, $2, $3, 0, 'granted', $4, $4)
            ON CONFLICT ON CONSTRAINT enrollments_user_course_key DO UPDATE SET
                status = CASE WHEN {paid} THEN 'active' ELSE 'granted' END,
                updated_at = EXCLUDED.updated_at
            WHERE e.status = 'revoked'
            {returning}
            "#,
            paid = IS_PAID,
            returning = RETURNING,
        );

        sqlx::query_as::<_, UpsertedRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(user_id.as_str())
            .bind(course_id.as_str())
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("grant enrollment", e))
    }

    async fn revoke(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Option<UpsertedRow>, DomainError> {
        sqlx::query_as::<_, UpsertedRow>(
            r#"
            UPDATE enrollments SET status = 'revoked', updated_at = $3
            WHERE user_id = $1 AND course_id = $2 AND status <> 'revoked'
            RETURNING id, user_id, course_id, provider_order_id, provider_payment_id,
                      amount_paid_minor, status, enrolled_at, updated_at, false AS inserted
            "#,
        )
        .bind(user_id.as_str())
        .bind(course_id.as_str())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("revoke enrollment", e))
    }
}

#[async_trait]
impl EnrollmentRepository for PostgresEnrollmentRepository {
    async fn upsert(&self, write: EnrollmentWrite) -> Result<UpsertOutcome, DomainError> {
        let changed = match &write {
            EnrollmentWrite::Payment {
                confirmation,
                reactivate_revoked,
            } => self.upsert_payment(confirmation, *reactivate_revoked).await?,
            EnrollmentWrite::Grant { user_id, course_id } => {
                self.upsert_grant(user_id, course_id).await?
            }
            EnrollmentWrite::Revoke { user_id, course_id } => {
                self.revoke(user_id, course_id).await?
            }
        };

        match changed {
            Some(UpsertedRow { enrollment: row, inserted: true }) => {
                Ok(UpsertOutcome::Created(Enrollment::try_from(row)?))
            }
            Some(UpsertedRow { enrollment: row, inserted: false }) => {
                Ok(UpsertOutcome::Updated(Enrollment::try_from(row)?))
            }
            None => {
                // The WHERE clause declined the change; report the row as it stands.
                let (user_id, course_id) = write.key();
                Ok(match self.find(user_id, course_id).await? {
                    Some(existing) => UpsertOutcome::Unchanged(existing),
                    None => UpsertOutcome::Missing,
                })
            }
        }
    }

    async fn find(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Option<Enrollment>, DomainError> {
        let row: Option<EnrollmentRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, course_id, provider_order_id, provider_payment_id,
                   amount_paid_minor, status, enrolled_at, updated_at
            FROM enrollments
            WHERE user_id = $1 AND course_id = $2
            "#,
        )
        .bind(user_id.as_str())
        .bind(course_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("find enrollment", e))?;

        row.map(Enrollment::try_from).transpose()
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Enrollment>, DomainError> {
        let rows: Vec<EnrollmentRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, course_id, provider_order_id, provider_payment_id,
                   amount_paid_minor, status, enrolled_at, updated_at
            FROM enrollments
            WHERE user_id = $1
            ORDER BY enrolled_at DESC
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list enrollments", e))?;

        rows.into_iter().map(Enrollment::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str) -> EnrollmentRow {
        EnrollmentRow {
            id: Uuid::new_v4(),
            user_id: "user-1".to_string(),
            course_id: "course-1".to_string(),
            provider_order_id: Some("order_1".to_string()),
            provider_payment_id: Some("pay_1".to_string()),
            amount_paid_minor: 299_900,
            status: status.to_string(),
            enrolled_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn row_converts_to_enrollment() {
        let enrollment = Enrollment::try_from(row("active")).unwrap();
        assert_eq!(enrollment.status, EnrollmentStatus::Active);
        assert_eq!(enrollment.amount_paid.minor_units(), 299_900);
        assert!(enrollment.is_paid());
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = Enrollment::try_from(row("pending")).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn negative_amount_is_rejected() {
        let mut r = row("active");
        r.amount_paid_minor = -1;
        assert!(Enrollment::try_from(r).is_err());
    }
}
