//! In-memory adapters.
//!
//! Used by tests and by local runs without a database. The enrollment store
//! applies the same merge rules as the Postgres adapter inside one lock, so
//! concurrency tests against it exercise the real contract.

mod course_catalog;
mod enrollment_repository;
mod notification_queue;
mod user_directory;

pub use course_catalog::InMemoryCourseCatalog;
pub use enrollment_repository::InMemoryEnrollmentRepository;
pub use notification_queue::RecordingNotificationQueue;
pub use user_directory::InMemoryUserDirectory;
