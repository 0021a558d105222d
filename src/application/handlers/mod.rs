//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod enrollment;

pub use enrollment::{
    // Access
    AccessGuard, CheckLectureAccessHandler, CheckLectureAccessQuery, LectureAccess,
    // Orders and payments
    CreateOrderCommand, CreateOrderHandler, CreateOrderResult, OrderSettings,
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, WebhookOutcome,
    VerifyPaymentCommand, VerifyPaymentHandler, VerifyPaymentResult,
    // Queries
    EnrollmentSummary, ListMyEnrollmentsHandler, ListMyEnrollmentsQuery,
    // Admin
    GrantAccessHandler, ManageAccessCommand, ManageAccessResult, RevokeAccessHandler,
};
