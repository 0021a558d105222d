//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - JWT session validation
//! - `http` - axum REST API
//! - `memory` - In-memory storage for tests and local runs
//! - `notification` - Resend email sender and background delivery worker
//! - `postgres` - PostgreSQL storage
//! - `razorpay` - Payment provider REST client and mock

pub mod auth;
pub mod http;
pub mod memory;
pub mod notification;
pub mod postgres;
pub mod razorpay;

pub use auth::{JwtConfig, JwtSessionValidator, MockSessionValidator};
pub use memory::{
    InMemoryCourseCatalog, InMemoryEnrollmentRepository, InMemoryUserDirectory,
    RecordingNotificationQueue,
};
pub use notification::{
    notification_channel, ChannelNotificationQueue, LogNotificationSender, NotificationWorker,
    NotificationWorkerConfig, ResendEmailSender,
};
pub use postgres::{PostgresCourseCatalog, PostgresEnrollmentRepository, PostgresUserDirectory};
pub use razorpay::{MockPaymentProvider, RazorpayConfig, RazorpayPaymentAdapter};
