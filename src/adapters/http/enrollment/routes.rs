//! HTTP routes for enrollment endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    create_order, grant_access, lecture_access, my_enrollments, payment_webhook, revoke_access,
    verify_payment, EnrollmentHandlers,
};

/// Creates the enrollment router, suitable for nesting at `/api`.
///
/// # Routes
///
/// ## Student
/// - `POST /enrollments/create-order` - Start checkout
/// - `POST /enrollments/verify-payment` - Confirm checkout from the browser
/// - `GET /enrollments/my` - List own enrollments with progress
/// - `GET /lectures/:lecture_id/access` - Lecture access check
///
/// ## Provider
/// - `POST /enrollments/webhook` - Signature-gated payment events
///
/// ## Admin
/// - `POST /admin/enrollments/grant` - Give access without payment
/// - `POST /admin/enrollments/revoke` - Withdraw access
pub fn enrollment_routes(handlers: EnrollmentHandlers) -> Router {
    Router::new()
        .route("/enrollments/create-order", post(create_order))
        .route("/enrollments/verify-payment", post(verify_payment))
        .route("/enrollments/webhook", post(payment_webhook))
        .route("/enrollments/my", get(my_enrollments))
        .route("/lectures/:lecture_id/access", get(lecture_access))
        .route("/admin/enrollments/grant", post(grant_access))
        .route("/admin/enrollments/revoke", post(revoke_access))
        .with_state(handlers)
}
