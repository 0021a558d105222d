//! Enrollment aggregate and its merge rules.
//!
//! An Enrollment records a user's access to one course. Every write, whether
//! it comes from a checkout callback, a provider webhook or an administrator,
//! is expressed as an [`EnrollmentWrite`] and resolved against the current row
//! by [`Enrollment::resolve`]. Storage adapters must apply exactly these rules
//! in one atomic statement keyed on (user, course).
//!
//! # Invariants
//!
//! - At most one enrollment per (user_id, course_id)
//! - Once paid (positive amount and a payment id) the amount, payment id and
//!   order id are never replaced
//! - Status changes follow [`EnrollmentStatus`] transitions
//! - `revoked` is left alone by payments unless reactivation is enabled

use crate::domain::foundation::{
    CourseId, DomainError, EnrollmentId, ErrorCode, Money, StateMachine, Timestamp, UserId,
};
use serde::{Deserialize, Serialize};

use super::EnrollmentStatus;

/// Which signal reported the payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentSource {
    /// Browser callback after checkout completes.
    ClientCallback,
    /// Provider-initiated webhook delivery.
    Webhook,
}

impl PaymentSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentSource::ClientCallback => "client_callback",
            PaymentSource::Webhook => "webhook",
        }
    }
}

/// A verified report that a payment for (user, course) succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentConfirmation {
    pub user_id: UserId,
    pub course_id: CourseId,
    pub order_id: Option<String>,
    pub payment_id: String,
    pub amount: Money,
    pub source: PaymentSource,
}

/// A requested change to the (user, course) enrollment row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrollmentWrite {
    /// Record a confirmed payment.
    Payment {
        confirmation: PaymentConfirmation,
        /// Whether a payment may move a revoked row back to active.
        reactivate_revoked: bool,
    },
    /// Administrator grants access without payment.
    Grant { user_id: UserId, course_id: CourseId },
    /// Administrator withdraws access.
    Revoke { user_id: UserId, course_id: CourseId },
}

impl EnrollmentWrite {
    /// The uniqueness key this write targets.
    pub fn key(&self) -> (&UserId, &CourseId) {
        match self {
            EnrollmentWrite::Payment { confirmation, .. } => {
                (&confirmation.user_id, &confirmation.course_id)
            }
            EnrollmentWrite::Grant { user_id, course_id }
            | EnrollmentWrite::Revoke { user_id, course_id } => (user_id, course_id),
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            EnrollmentWrite::Payment { .. } => "payment",
            EnrollmentWrite::Grant { .. } => "grant",
            EnrollmentWrite::Revoke { .. } => "revoke",
        }
    }
}

/// What a storage adapter must do to apply a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResolution {
    /// No row exists; insert this one.
    Insert(Enrollment),
    /// Replace the existing row with this one.
    Update(Enrollment),
    /// The existing row already satisfies the write.
    Keep,
    /// No row exists and the write does not create one.
    Skip,
}

/// Enrollment aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub user_id: UserId,
    pub course_id: CourseId,

    /// Provider order the payment was made against.
    pub provider_order_id: Option<String>,

    /// Provider payment id, set once paid.
    pub provider_payment_id: Option<String>,

    /// Amount paid in minor units. Zero for admin grants.
    pub amount_paid: Money,

    pub status: EnrollmentStatus,
    pub enrolled_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Enrollment {
    /// Creates an active, paid enrollment from a confirmed payment.
    pub fn from_payment(id: EnrollmentId, confirmation: &PaymentConfirmation, now: Timestamp) -> Self {
        Self {
            id,
            user_id: confirmation.user_id.clone(),
            course_id: confirmation.course_id.clone(),
            provider_order_id: confirmation.order_id.clone(),
            provider_payment_id: Some(confirmation.payment_id.clone()),
            amount_paid: confirmation.amount,
            status: EnrollmentStatus::Active,
            enrolled_at: now,
            updated_at: now,
        }
    }

    /// Creates a free enrollment granted by an administrator.
    pub fn from_grant(id: EnrollmentId, user_id: UserId, course_id: CourseId, now: Timestamp) -> Self {
        Self {
            id,
            user_id,
            course_id,
            provider_order_id: None,
            provider_payment_id: None,
            amount_paid: Money::zero(),
            status: EnrollmentStatus::Granted,
            enrolled_at: now,
            updated_at: now,
        }
    }

    /// True once a positive amount and a payment id are both recorded.
    pub fn is_paid(&self) -> bool {
        self.amount_paid.is_positive() && self.provider_payment_id.is_some()
    }

    /// Whether the current status grants access to paid lectures.
    pub fn has_access(&self) -> bool {
        self.status.grants_access()
    }

    /// Attaches a payment to an unpaid row and activates it.
    ///
    /// # Errors
    ///
    /// Fails if the row is already paid or the status cannot become active.
    pub fn attach_payment(
        &mut self,
        confirmation: &PaymentConfirmation,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        if self.is_paid() {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Enrollment already has a recorded payment",
            ));
        }
        if self.status != EnrollmentStatus::Active {
            self.transition(EnrollmentStatus::Active)?;
        }
        if confirmation.order_id.is_some() {
            self.provider_order_id = confirmation.order_id.clone();
        }
        self.provider_payment_id = Some(confirmation.payment_id.clone());
        self.amount_paid = confirmation.amount;
        self.updated_at = now;
        Ok(())
    }

    /// Moves a paid row back to active without touching payment fields.
    pub fn reactivate(&mut self, now: Timestamp) -> Result<(), DomainError> {
        self.transition(EnrollmentStatus::Active)?;
        self.updated_at = now;
        Ok(())
    }

    /// Restores a revoked row. Paid rows become active, unpaid ones granted.
    pub fn restore(&mut self, now: Timestamp) -> Result<(), DomainError> {
        let target = if self.is_paid() {
            EnrollmentStatus::Active
        } else {
            EnrollmentStatus::Granted
        };
        self.transition(target)?;
        self.updated_at = now;
        Ok(())
    }

    /// Withdraws access. Payment fields are kept for the record.
    pub fn revoke(&mut self, now: Timestamp) -> Result<(), DomainError> {
        self.transition(EnrollmentStatus::Revoked)?;
        self.updated_at = now;
        Ok(())
    }

    fn transition(&mut self, target: EnrollmentStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target).map_err(|e| {
            DomainError::new(ErrorCode::InvalidStateTransition, e.to_string())
        })?;
        Ok(())
    }

    /// Decides how `write` applies to the current row.
    ///
    /// `new_id` is only used when a row is inserted.
    pub fn resolve(
        existing: Option<&Enrollment>,
        write: &EnrollmentWrite,
        new_id: EnrollmentId,
        now: Timestamp,
    ) -> Result<WriteResolution, DomainError> {
        match write {
            EnrollmentWrite::Payment {
                confirmation,
                reactivate_revoked,
            } => {
                let Some(current) = existing else {
                    return Ok(WriteResolution::Insert(Enrollment::from_payment(
                        new_id,
                        confirmation,
                        now,
                    )));
                };
                if current.status == EnrollmentStatus::Revoked && !reactivate_revoked {
                    return Ok(WriteResolution::Keep);
                }
                if current.status == EnrollmentStatus::Active && current.is_paid() {
                    return Ok(WriteResolution::Keep);
                }
                let mut next = current.clone();
                if next.is_paid() {
                    next.reactivate(now)?;
                } else {
                    next.attach_payment(confirmation, now)?;
                }
                Ok(WriteResolution::Update(next))
            }
            EnrollmentWrite::Grant { user_id, course_id } => match existing {
                None => Ok(WriteResolution::Insert(Enrollment::from_grant(
                    new_id,
                    user_id.clone(),
                    course_id.clone(),
                    now,
                ))),
                Some(current) if current.status == EnrollmentStatus::Revoked => {
                    let mut next = current.clone();
                    next.restore(now)?;
                    Ok(WriteResolution::Update(next))
                }
                Some(_) => Ok(WriteResolution::Keep),
            },
            EnrollmentWrite::Revoke { .. } => match existing {
                None => Ok(WriteResolution::Skip),
                Some(current) if current.status == EnrollmentStatus::Revoked => {
                    Ok(WriteResolution::Keep)
                }
                Some(current) => {
                    let mut next = current.clone();
                    next.revoke(now)?;
                    Ok(WriteResolution::Update(next))
                }
            },
        }
    }
}
