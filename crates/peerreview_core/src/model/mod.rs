//! Domain model for users, teams, review cycles and anonymous feedback.
//!
//! # Responsibility
//! - Define the read/write shapes shared by repositories and services.
//! - Keep input validation rules in one place.
//!
//! # Invariants
//! - Users are identified by email, teams and cycles by name.
//! - Feedback records never carry reviewer identity.

pub mod cycle;
pub mod review;
pub mod user;
pub mod validation;
