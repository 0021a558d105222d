//! HandlePaymentWebhookHandler - Processes payment provider webhooks.
//!
//! Only `payment.captured` changes state. The event's order notes carry the
//! (course, user) pair attached at order creation. Redelivery of an applied
//! event is a no-op.

use std::sync::Arc;

use crate::domain::enrollment::{
    Enrollment, EnrollmentStatus, EnrollmentWrite, PaymentSignatures, PaymentWebhookEvent,
    WebhookError,
};
use crate::ports::{EnrollmentRepository, NotificationQueue, PurchaseNotification, UpsertOutcome};

/// Command carrying a raw webhook delivery.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    /// Exact request body bytes; the signature covers these.
    pub payload: Vec<u8>,
    pub signature: Option<String>,
}

/// Result of handling a webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// The payment created or upgraded an enrollment.
    Enrolled(Enrollment),
    /// The enrollment already reflected this payment.
    AlreadyApplied(Enrollment),
    /// The enrollment is revoked and reactivation is disabled.
    RevokedUnchanged(Enrollment),
    /// Event type is not acted on.
    Ignored { event_type: String },
}

/// Handler for payment provider webhooks.
pub struct HandlePaymentWebhookHandler {
    signatures: PaymentSignatures,
    repository: Arc<dyn EnrollmentRepository>,
    notifications: Arc<dyn NotificationQueue>,
    reactivate_revoked: bool,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        signatures: PaymentSignatures,
        repository: Arc<dyn EnrollmentRepository>,
        notifications: Arc<dyn NotificationQueue>,
        reactivate_revoked: bool,
    ) -> Self {
        Self {
            signatures,
            repository,
            notifications,
            reactivate_revoked,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentWebhookCommand,
    ) -> Result<WebhookOutcome, WebhookError> {
        // 1. Verify signature over the raw body
        let signature = cmd
            .signature
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(WebhookError::MissingSignature)?;

        if !self.signatures.verify_webhook(&cmd.payload, signature) {
            tracing::warn!(
                payload_len = cmd.payload.len(),
                "Webhook signature verification failed"
            );
            return Err(WebhookError::InvalidSignature);
        }

        // 2. Parse event
        let event: PaymentWebhookEvent = serde_json::from_slice(&cmd.payload)
            .map_err(|e| WebhookError::ParseError(e.to_string()))?;

        if !event.event_type().is_actionable() {
            tracing::debug!(event_type = %event.event, "Ignoring webhook event");
            return Ok(WebhookOutcome::Ignored {
                event_type: event.event,
            });
        }

        // 3. Extract the confirmation from the captured payment
        let payment = event
            .payment()
            .ok_or_else(|| WebhookError::InvalidPayload("missing payment entity".to_string()))?;
        let confirmation = payment.to_confirmation()?;

        tracing::info!(
            payment_id = %confirmation.payment_id,
            user_id = %confirmation.user_id,
            course_id = %confirmation.course_id,
            amount = confirmation.amount.minor_units(),
            "Processing captured payment"
        );

        // 4. Apply the payment
        let user_id = confirmation.user_id.clone();
        let course_id = confirmation.course_id.clone();
        let amount = confirmation.amount;
        let outcome = self
            .repository
            .upsert(EnrollmentWrite::Payment {
                confirmation,
                reactivate_revoked: self.reactivate_revoked,
            })
            .await
            .map_err(|e| WebhookError::Database(e.to_string()))?;

        // 5. Notify only on the transition into the paid state
        if outcome.became_paid() {
            self.notifications.enqueue(PurchaseNotification {
                user_id,
                course_id,
                amount,
            });
        }

        match outcome {
            UpsertOutcome::Created(e) | UpsertOutcome::Updated(e) => {
                tracing::info!(enrollment_id = %e.id, "Enrollment activated by webhook");
                Ok(WebhookOutcome::Enrolled(e))
            }
            UpsertOutcome::Unchanged(e) if e.status == EnrollmentStatus::Revoked => {
                tracing::warn!(
                    enrollment_id = %e.id,
                    "Captured payment for revoked enrollment left unchanged"
                );
                Ok(WebhookOutcome::RevokedUnchanged(e))
            }
            UpsertOutcome::Unchanged(e) => {
                tracing::debug!(enrollment_id = %e.id, "Payment already recorded");
                Ok(WebhookOutcome::AlreadyApplied(e))
            }
            UpsertOutcome::Missing => Err(WebhookError::Database(
                "payment upsert returned no enrollment".to_string(),
            )),
        }
    }
}
