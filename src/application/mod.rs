//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers write through the enrollment upsert; query handlers only read.

pub mod handlers;

pub use handlers::*;
