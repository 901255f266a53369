//! User read models.

use serde::{Deserialize, Serialize};

/// Full profile of one user, including the teams they belong to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserInfo {
    pub name: String,
    pub email: String,
    /// Free-text statement shown to reviewers.
    #[serde(rename = "goal")]
    pub goals: String,
    pub teams: Vec<String>,
}

/// Name/email pair, used for reviewee listings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserSummary {
    pub name: String,
    pub email: String,
}

impl UserSummary {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}
