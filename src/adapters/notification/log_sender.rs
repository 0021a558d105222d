//! Sender used when no email provider is configured.

use async_trait::async_trait;

use crate::ports::{NotificationError, NotificationSender, PurchaseConfirmation};

/// Writes confirmations to the log instead of sending them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotificationSender;

#[async_trait]
impl NotificationSender for LogNotificationSender {
    async fn send_purchase_confirmation(
        &self,
        confirmation: &PurchaseConfirmation,
    ) -> Result<(), NotificationError> {
        tracing::info!(
            recipient = %confirmation.recipient_email,
            course = %confirmation.course_title,
            amount_minor = confirmation.amount.minor_units(),
            "Email disabled; purchase confirmation not sent"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Money;

    #[tokio::test]
    async fn always_succeeds() {
        let confirmation = PurchaseConfirmation {
            recipient_name: "Asha".to_string(),
            recipient_email: "asha@example.com".to_string(),
            course_title: "Polity".to_string(),
            amount: Money::from_major(2999).unwrap(),
        };
        assert!(LogNotificationSender
            .send_purchase_confirmation(&confirmation)
            .await
            .is_ok());
    }
}
