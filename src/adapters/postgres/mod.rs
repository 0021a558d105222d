//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresEnrollmentRepository` - Atomic enrollment upserts
//! - `PostgresCourseCatalog` - Course, lecture and progress reads
//! - `PostgresUserDirectory` - Contact lookups for notifications

mod course_catalog;
mod enrollment_repository;
mod user_directory;

pub use course_catalog::PostgresCourseCatalog;
pub use enrollment_repository::PostgresEnrollmentRepository;
pub use user_directory::PostgresUserDirectory;
