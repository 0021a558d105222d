//! Enrollment command and query handlers.

mod check_lecture_access;
mod create_order;
mod handle_payment_webhook;
mod list_my_enrollments;
mod manage_access;
mod verify_payment;

pub use check_lecture_access::{
    AccessGuard, CheckLectureAccessHandler, CheckLectureAccessQuery, LectureAccess,
};
pub use create_order::{CreateOrderCommand, CreateOrderHandler, CreateOrderResult, OrderSettings};
pub use handle_payment_webhook::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, WebhookOutcome,
};
pub use list_my_enrollments::{EnrollmentSummary, ListMyEnrollmentsHandler, ListMyEnrollmentsQuery};
pub use manage_access::{
    GrantAccessHandler, ManageAccessCommand, ManageAccessResult, RevokeAccessHandler,
};
pub use verify_payment::{VerifyPaymentCommand, VerifyPaymentHandler, VerifyPaymentResult};
