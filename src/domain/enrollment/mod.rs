//! Enrollment domain - course access bought or granted per (user, course).
//!
//! Payments are reported twice and in any order: once by the browser after
//! checkout and once by the provider's webhook. Both reports, and admin
//! grants and revokes, funnel through [`Enrollment::resolve`] so the stored
//! row converges to the same state regardless of arrival order.

mod access;
mod aggregate;
mod errors;
mod payment_event;
mod receipt;
mod signature;
mod status;
mod webhook_errors;

pub use access::{AccessDecision, AccessRule};
pub use aggregate::{
    Enrollment, EnrollmentWrite, PaymentConfirmation, PaymentSource, WriteResolution,
};
pub use errors::EnrollmentError;
pub use payment_event::{
    PaymentEntity, PaymentEventType, PaymentWebhookEvent, NOTE_COURSE_ID, NOTE_USER_ID,
};
pub use receipt::{receipt_token, MAX_RECEIPT_LEN};
pub use signature::{checkout_message, PaymentSignatures, SignatureVerifier};
pub use status::EnrollmentStatus;
pub use webhook_errors::WebhookError;
