//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, money, errors)
//! - `catalog` - Read models for courses, lectures and progress
//! - `enrollment` - Enrollment lifecycle, payment signatures and access policy

pub mod catalog;
pub mod enrollment;
pub mod foundation;
