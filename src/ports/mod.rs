//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `EnrollmentRepository` - Atomic enrollment upserts and lookups
//! - `CourseCatalog` - Read-only courses, lectures and progress
//! - `UserDirectory` - Contact details for notifications
//!
//! ## External Service Ports
//!
//! - `PaymentProvider` - Order creation with the payment gateway
//! - `NotificationSender` / `NotificationQueue` - Best-effort purchase emails
//! - `SessionValidator` - Bearer token validation

mod course_catalog;
mod enrollment_repository;
mod notification;
mod payment_provider;
mod session_validator;
mod user_directory;

pub use course_catalog::CourseCatalog;
pub use enrollment_repository::{EnrollmentRepository, UpsertOutcome};
pub use notification::{
    NotificationError, NotificationQueue, NotificationSender, PurchaseConfirmation,
    PurchaseNotification,
};
pub use payment_provider::{
    CreateOrderRequest, PaymentError, PaymentErrorCode, PaymentOrder, PaymentProvider,
};
pub use session_validator::SessionValidator;
pub use user_directory::{UserContact, UserDirectory};
