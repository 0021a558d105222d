//! Notification adapters.
//!
//! - `ResendEmailSender` - Purchase confirmation emails via Resend
//! - `LogNotificationSender` - Logs confirmations when email is disabled
//! - `ChannelNotificationQueue` / `NotificationWorker` - Background delivery with retries

mod log_sender;
mod resend_sender;
mod worker;

pub use log_sender::LogNotificationSender;
pub use resend_sender::ResendEmailSender;
pub use worker::{
    notification_channel, ChannelNotificationQueue, NotificationWorker, NotificationWorkerConfig,
};
