//! HTTP adapter for enrollment endpoints.
//!
//! Exposes the enrollment workflow via REST API:
//! - `POST /api/enrollments/create-order` - Create a provider order for a course
//! - `POST /api/enrollments/verify-payment` - Browser checkout confirmation
//! - `POST /api/enrollments/webhook` - Provider webhook
//! - `GET /api/enrollments/my` - Current user's enrollments
//! - `GET /api/lectures/:lecture_id/access` - Lecture access check
//! - `POST /api/admin/enrollments/grant` - Admin grant
//! - `POST /api/admin/enrollments/revoke` - Admin revoke

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{status_for, EnrollmentHandlers, PROVIDER_SIGNATURE_HEADER, SIGNATURE_HEADER};
pub use routes::enrollment_routes;
