//! VerifyPaymentHandler - Command handler for the checkout success callback.
//!
//! The browser reports `(order_id, payment_id, signature)` after checkout.
//! The signature is an HMAC of `"{order_id}|{payment_id}"` under the checkout
//! secret, so a verified triple proves the provider accepted the payment.
//! The provider webhook may already have recorded it; both paths converge
//! on the same upsert.

use std::sync::Arc;

use crate::domain::enrollment::{
    Enrollment, EnrollmentError, EnrollmentStatus, EnrollmentWrite, PaymentConfirmation,
    PaymentSignatures, PaymentSource,
};
use crate::domain::foundation::{CourseId, UserId};
use crate::ports::{
    CourseCatalog, EnrollmentRepository, NotificationQueue, PurchaseNotification, UpsertOutcome,
};

/// Command carrying the checkout callback fields.
#[derive(Debug, Clone)]
pub struct VerifyPaymentCommand {
    pub user_id: UserId,
    pub course_id: CourseId,
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

/// Result of a verified payment.
#[derive(Debug, Clone)]
pub struct VerifyPaymentResult {
    pub enrollment: Enrollment,
    /// False when an earlier signal had already recorded this payment.
    pub newly_enrolled: bool,
}

/// Handler for verifying checkout callbacks.
pub struct VerifyPaymentHandler {
    signatures: PaymentSignatures,
    catalog: Arc<dyn CourseCatalog>,
    repository: Arc<dyn EnrollmentRepository>,
    notifications: Arc<dyn NotificationQueue>,
    reactivate_revoked: bool,
}

impl VerifyPaymentHandler {
    pub fn new(
        signatures: PaymentSignatures,
        catalog: Arc<dyn CourseCatalog>,
        repository: Arc<dyn EnrollmentRepository>,
        notifications: Arc<dyn NotificationQueue>,
        reactivate_revoked: bool,
    ) -> Self {
        Self {
            signatures,
            catalog,
            repository,
            notifications,
            reactivate_revoked,
        }
    }

    pub async fn handle(&self, cmd: VerifyPaymentCommand) -> Result<VerifyPaymentResult, EnrollmentError> {
        // 1. Required fields
        for (field, value) in [
            ("orderId", &cmd.order_id),
            ("paymentId", &cmd.payment_id),
            ("signature", &cmd.signature),
        ] {
            if value.trim().is_empty() {
                return Err(EnrollmentError::validation(field, "is required"));
            }
        }

        // 2. Signature must verify before anything is read or written
        if !self
            .signatures
            .verify_checkout(&cmd.order_id, &cmd.payment_id, &cmd.signature)
        {
            tracing::warn!(
                user_id = %cmd.user_id,
                course_id = %cmd.course_id,
                order_id = %cmd.order_id,
                payment_id = %cmd.payment_id,
                "Checkout signature verification failed"
            );
            return Err(EnrollmentError::InvalidSignature);
        }

        // 3. Course price is the amount recorded
        let course = self
            .catalog
            .get_course(&cmd.course_id)
            .await?
            .ok_or_else(|| EnrollmentError::course_not_found(cmd.course_id.clone()))?;

        // 4. Apply the payment
        let write = EnrollmentWrite::Payment {
            confirmation: PaymentConfirmation {
                user_id: cmd.user_id.clone(),
                course_id: cmd.course_id.clone(),
                order_id: Some(cmd.order_id.clone()),
                payment_id: cmd.payment_id.clone(),
                amount: course.price,
                source: PaymentSource::ClientCallback,
            },
            reactivate_revoked: self.reactivate_revoked,
        };
        let outcome = self.repository.upsert(write).await?;

        // 5. Notify only on the transition into the paid state
        if outcome.became_paid() {
            self.notifications.enqueue(PurchaseNotification {
                user_id: cmd.user_id.clone(),
                course_id: cmd.course_id.clone(),
                amount: course.price,
            });
        }

        let newly_enrolled = matches!(
            outcome,
            UpsertOutcome::Created(_) | UpsertOutcome::Updated(_)
        );
        let enrollment = outcome.into_enrollment().ok_or_else(|| {
            EnrollmentError::infrastructure("payment upsert returned no enrollment")
        })?;

        if enrollment.status == EnrollmentStatus::Revoked {
            tracing::warn!(
                user_id = %cmd.user_id,
                course_id = %cmd.course_id,
                payment_id = %cmd.payment_id,
                "Payment confirmed for revoked enrollment; access stays revoked"
            );
            return Err(EnrollmentError::AccessRevoked(cmd.course_id));
        }

        tracing::info!(
            user_id = %cmd.user_id,
            course_id = %cmd.course_id,
            enrollment_id = %enrollment.id,
            newly_enrolled,
            "Checkout payment verified"
        );

        Ok(VerifyPaymentResult {
            enrollment,
            newly_enrolled,
        })
    }
}
