//! Notification ports.
//!
//! Purchase confirmations are best effort. Request handlers only `enqueue`;
//! a background worker resolves contact details and calls the sender with
//! retries. Neither port can fail an enrollment.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{CourseId, Money, UserId};

/// A purchase confirmation waiting to be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseNotification {
    pub user_id: UserId,
    pub course_id: CourseId,
    pub amount: Money,
}

/// Fully resolved confirmation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseConfirmation {
    pub recipient_name: String,
    pub recipient_email: String,
    pub course_title: String,
    pub amount: Money,
}

/// Errors from delivering a notification.
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Recipient rejected: {0}")]
    Rejected(String),
}

impl NotificationError {
    /// Whether another attempt might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, NotificationError::Delivery(_))
    }
}

/// Delivers purchase confirmations (email).
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send_purchase_confirmation(
        &self,
        confirmation: &PurchaseConfirmation,
    ) -> Result<(), NotificationError>;
}

/// Fire-and-forget hand-off used by request handlers.
pub trait NotificationQueue: Send + Sync {
    /// Schedules delivery. Never blocks and never fails the caller.
    fn enqueue(&self, notification: PurchaseNotification);
}
