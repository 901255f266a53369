//! Reviewee eligibility resolution.
//!
//! # Responsibility
//! - Compute who a user may write feedback about in a given cycle.
//!
//! # Invariants
//! - Result = teammates ∪ reviewers granted by the user for the cycle,
//!   never including the user.
//! - Any storage error aborts the whole resolution; no partial lists.
//! - Result order carries no meaning.

use crate::model::user::UserSummary;
use crate::model::validation::require_text;
use crate::repo::review_repo::ReviewRepository;
use crate::repo::RepoResult;
use std::collections::HashSet;

/// Use-case service answering "whom can this user review?".
pub struct EligibilityResolver<R: ReviewRepository> {
    repo: R,
    allow_duplicate_eligibility: bool,
}

impl<R: ReviewRepository> EligibilityResolver<R> {
    /// Creates a resolver.
    ///
    /// With `allow_duplicate_eligibility = true`, a person who is both a
    /// teammate and a requested reviewer is listed twice. With `false`, only
    /// the first occurrence (the teammate entry) is kept.
    pub fn new(repo: R, allow_duplicate_eligibility: bool) -> Self {
        Self {
            repo,
            allow_duplicate_eligibility,
        }
    }

    /// Returns everyone `email` may review during `cycle`.
    pub fn resolve(&self, email: &str, cycle: &str) -> RepoResult<Vec<UserSummary>> {
        let email = require_text("email", email)?;
        let cycle = require_text("cycle", cycle)?;

        let mut reviewees = self.repo.list_teammates(email)?;
        reviewees.extend(self.repo.list_requested_reviewers(email, cycle)?);

        if !self.allow_duplicate_eligibility {
            let mut seen = HashSet::new();
            reviewees.retain(|summary| seen.insert(summary.email.clone()));
        }
        Ok(reviewees)
    }
}
