//! HTTP adapters - REST API implementations.
//!
//! - `enrollment` - Enrollment, checkout and admin access endpoints
//! - `middleware` - Bearer authentication
//! - `router` - Application router with health check

pub mod enrollment;
pub mod middleware;
pub mod router;

pub use enrollment::{enrollment_routes, EnrollmentHandlers};
pub use middleware::{auth_middleware, AuthState, RequireAdmin, RequireAuth};
pub use router::{app_router, health};
