//! Anonymous feedback model.
//!
//! # Invariants
//! - No type in this module has a field for the reviewer. Anonymity is a
//!   property of the shapes, so no query can leak it by accident.

use serde::{Deserialize, Serialize};

/// Category of a single feedback item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    Strength,
    Opportunity,
}

impl FeedbackKind {
    /// Stable value stored in `reviews.kind`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Opportunity => "opportunity",
        }
    }

    /// Parses a persisted `reviews.kind` value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "strength" => Some(Self::Strength),
            "opportunity" => Some(Self::Opportunity),
            _ => None,
        }
    }
}

/// One persisted feedback row as returned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackItem {
    pub cycle: String,
    pub text: String,
    pub kind: FeedbackKind,
}

/// All feedback a recipient received during one cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CycleReviews {
    pub cycle: String,
    pub strengths: Vec<String>,
    #[serde(rename = "growth_opportunities")]
    pub opportunities: Vec<String>,
}

impl CycleReviews {
    pub fn new(cycle: impl Into<String>) -> Self {
        Self {
            cycle: cycle.into(),
            ..Self::default()
        }
    }

    /// Appends one item to the list matching its kind.
    pub fn push(&mut self, kind: FeedbackKind, text: String) {
        match kind {
            FeedbackKind::Strength => self.strengths.push(text),
            FeedbackKind::Opportunity => self.opportunities.push(text),
        }
    }
}
