//! Background delivery of purchase confirmations.
//!
//! Request handlers hand notifications to a bounded channel and return. The
//! worker resolves the recipient and course, then calls the sender with
//! exponential backoff. A full channel drops the notification with a warning;
//! enrollment never waits on email.
//!
//! ## Graceful Shutdown
//!
//! On the shutdown signal the worker delivers whatever is already queued,
//! then stops.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};

use crate::ports::{
    CourseCatalog, NotificationQueue, NotificationSender, PurchaseConfirmation,
    PurchaseNotification, UserDirectory,
};

/// Retry settings for notification delivery.
#[derive(Debug, Clone)]
pub struct NotificationWorkerConfig {
    /// Attempts per notification, including the first.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for NotificationWorkerConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl NotificationWorkerConfig {
    /// Delay after the given failed attempt (1-based).
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// Sending half handed to request handlers.
#[derive(Clone)]
pub struct ChannelNotificationQueue {
    tx: mpsc::Sender<PurchaseNotification>,
}

/// Creates a queue and the receiver its worker consumes.
pub fn notification_channel(
    capacity: usize,
) -> (ChannelNotificationQueue, mpsc::Receiver<PurchaseNotification>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (ChannelNotificationQueue { tx }, rx)
}

impl NotificationQueue for ChannelNotificationQueue {
    fn enqueue(&self, notification: PurchaseNotification) {
        match self.tx.try_send(notification) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(n)) => {
                tracing::warn!(
                    user_id = %n.user_id,
                    course_id = %n.course_id,
                    "Notification queue full; dropping purchase confirmation"
                );
            }
            Err(mpsc::error::TrySendError::Closed(n)) => {
                tracing::warn!(
                    user_id = %n.user_id,
                    course_id = %n.course_id,
                    "Notification worker stopped; dropping purchase confirmation"
                );
            }
        }
    }
}

/// Why one delivery attempt failed.
#[derive(Debug)]
enum AttemptError {
    Retryable(String),
    Permanent(String),
}

/// Consumes queued notifications and delivers them.
pub struct NotificationWorker {
    directory: Arc<dyn UserDirectory>,
    catalog: Arc<dyn CourseCatalog>,
    sender: Arc<dyn NotificationSender>,
    config: NotificationWorkerConfig,
}

impl NotificationWorker {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        catalog: Arc<dyn CourseCatalog>,
        sender: Arc<dyn NotificationSender>,
        config: NotificationWorkerConfig,
    ) -> Self {
        Self {
            directory,
            catalog,
            sender,
            config,
        }
    }

    /// Runs until shutdown is signalled or every queue handle is dropped.
    pub async fn run(
        &self,
        mut rx: mpsc::Receiver<PurchaseNotification>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    // A dropped sender counts as shutdown.
                    if changed.is_err() || *shutdown.borrow() {
                        rx.close();
                        while let Some(notification) = rx.recv().await {
                            self.deliver(notification).await;
                        }
                        tracing::info!("Notification worker stopped");
                        return;
                    }
                }

                next = rx.recv() => match next {
                    Some(notification) => { self.deliver(notification).await; }
                    None => {
                        tracing::info!("Notification queue closed; worker stopping");
                        return;
                    }
                },
            }
        }
    }

    /// Delivers one notification with retries. Returns true on success.
    pub async fn deliver(&self, notification: PurchaseNotification) -> bool {
        let max_attempts = self.config.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            match self.attempt(&notification).await {
                Ok(()) => {
                    tracing::info!(
                        user_id = %notification.user_id,
                        course_id = %notification.course_id,
                        attempt,
                        "Purchase confirmation sent"
                    );
                    return true;
                }
                Err(AttemptError::Permanent(reason)) => {
                    tracing::warn!(
                        user_id = %notification.user_id,
                        course_id = %notification.course_id,
                        reason = %reason,
                        "Purchase confirmation dropped"
                    );
                    return false;
                }
                Err(AttemptError::Retryable(reason)) if attempt < max_attempts => {
                    let delay = self.config.backoff_after(attempt);
                    tracing::debug!(
                        user_id = %notification.user_id,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        reason = %reason,
                        "Purchase confirmation failed; retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(AttemptError::Retryable(reason)) => {
                    tracing::error!(
                        user_id = %notification.user_id,
                        course_id = %notification.course_id,
                        attempts = max_attempts,
                        reason = %reason,
                        "Purchase confirmation failed after all attempts"
                    );
                }
            }
        }
        false
    }

    async fn attempt(&self, notification: &PurchaseNotification) -> Result<(), AttemptError> {
        let contact = self
            .directory
            .find_contact(&notification.user_id)
            .await
            .map_err(|e| AttemptError::Retryable(e.to_string()))?
            .ok_or_else(|| AttemptError::Permanent("user has no contact details".to_string()))?;

        let course = self
            .catalog
            .get_course(&notification.course_id)
            .await
            .map_err(|e| AttemptError::Retryable(e.to_string()))?
            .ok_or_else(|| AttemptError::Permanent("course no longer exists".to_string()))?;

        let confirmation = PurchaseConfirmation {
            recipient_name: contact.name,
            recipient_email: contact.email,
            course_title: course.title,
            amount: notification.amount,
        };

        self.sender
            .send_purchase_confirmation(&confirmation)
            .await
            .map_err(|e| {
                if e.is_retryable() {
                    AttemptError::Retryable(e.to_string())
                } else {
                    AttemptError::Permanent(e.to_string())
                }
            })
    }
}
