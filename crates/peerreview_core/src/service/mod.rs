//! Core use-case services.
//!
//! # Responsibility
//! - Validate input, then orchestrate repository calls.
//! - Keep transport layers decoupled from storage details.

pub mod auth_service;
pub mod eligibility_service;
pub mod reference_service;
pub mod review_service;
pub mod user_service;
