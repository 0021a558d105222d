//! Notification queue that records instead of delivering.

use std::sync::Mutex;

use crate::ports::{NotificationQueue, PurchaseNotification};

/// Keeps every enqueued notification for later inspection.
#[derive(Default)]
pub struct RecordingNotificationQueue {
    items: Mutex<Vec<PurchaseNotification>>,
}

impl RecordingNotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything enqueued so far.
    pub fn enqueued(&self) -> Vec<PurchaseNotification> {
        self.items.lock().map(|items| items.clone()).unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.items.lock().map(|items| items.len()).unwrap_or(0)
    }
}

impl NotificationQueue for RecordingNotificationQueue {
    fn enqueue(&self, notification: PurchaseNotification) {
        if let Ok(mut items) = self.items.lock() {
            items.push(notification);
        }
    }
}
