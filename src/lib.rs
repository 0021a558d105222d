//! Coaching Enrollments - course purchase and access service.
//!
//! Students buy courses through a hosted checkout. The payment is confirmed
//! twice, once by the browser callback and once by the provider's webhook,
//! in either order. Both confirmations converge on a single enrollment row
//! per (student, course). Admins can grant and revoke access, and paid
//! lectures are gated on the enrollment.

pub mod adapters;
pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
