//! Anonymous feedback submission and per-cycle aggregation.
//!
//! # Responsibility
//! - Validate and persist feedback batches.
//! - Regroup stored feedback by cycle for the recipient.
//! - Record reviewer grants for cross-team reviews.
//!
//! # Invariants
//! - Submission writes `strengths.len() + opportunities.len()` rows or none.
//! - Nothing returned by this service identifies who wrote a feedback item.
//! - No ordering is promised across cycles or within a cycle's lists.

use crate::model::review::{CycleReviews, FeedbackKind};
use crate::model::validation::{require_email, require_entries, require_text};
use crate::repo::review_repo::ReviewRepository;
use crate::repo::RepoResult;
use std::collections::HashMap;

/// Use-case service over anonymous feedback.
pub struct ReviewAggregator<R: ReviewRepository> {
    repo: R,
}

impl<R: ReviewRepository> ReviewAggregator<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Stores a feedback batch for `recipient` in `cycle`.
    ///
    /// # Contract
    /// - Both lists must be non-empty; entries are trimmed and none may be blank.
    /// - Returns the number of stored rows.
    pub fn submit(
        &self,
        recipient: &str,
        cycle: &str,
        strengths: &[String],
        opportunities: &[String],
    ) -> RepoResult<usize> {
        let recipient = require_text("reviewee_email", recipient)?;
        let cycle = require_text("cycle", cycle)?;
        let strengths = require_entries("strengths", strengths)?;
        let opportunities = require_entries("growth_opportunities", opportunities)?;

        let items: Vec<(FeedbackKind, &str)> = strengths
            .into_iter()
            .map(|text| (FeedbackKind::Strength, text))
            .chain(
                opportunities
                    .into_iter()
                    .map(|text| (FeedbackKind::Opportunity, text)),
            )
            .collect();

        self.repo.insert_feedback(recipient, cycle, &items)
    }

    /// Returns one aggregate per cycle in which `recipient` received feedback.
    pub fn get_reviews(&self, recipient: &str) -> RepoResult<Vec<CycleReviews>> {
        let recipient = require_text("email", recipient)?;

        let mut by_cycle: HashMap<String, CycleReviews> = HashMap::new();
        for item in self.repo.list_feedback(recipient)? {
            by_cycle
                .entry(item.cycle.clone())
                .or_insert_with(|| CycleReviews::new(item.cycle))
                .push(item.kind, item.text);
        }
        Ok(by_cycle.into_values().collect())
    }

    /// Lets `reviewer` see `recipient` as a reviewee during `cycle`.
    pub fn request_reviewer(&self, recipient: &str, reviewer: &str, cycle: &str) -> RepoResult<()> {
        let recipient = require_text("email", recipient)?;
        let reviewer = require_email("user_email", reviewer)?;
        let cycle = require_text("cycle", cycle)?;
        self.repo.add_review_request(recipient, reviewer, cycle)
    }
}
