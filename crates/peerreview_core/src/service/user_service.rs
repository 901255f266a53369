//! User profile use-case service.
//!
//! # Invariants
//! - Team assignment and removal are idempotent; duplicate suppression is
//!   left to the `user_teams` unique index.

use crate::model::user::UserInfo;
use crate::model::validation::require_text;
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoResult;

/// Profile, goal and team-membership operations for the signed-in user.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns the profile for `email`, or `None` when the user never signed in.
    pub fn get_user(&self, email: &str) -> RepoResult<Option<UserInfo>> {
        let email = require_text("email", email)?;
        self.repo.get_user(email)
    }

    pub fn list_user_teams(&self, email: &str) -> RepoResult<Vec<String>> {
        let email = require_text("email", email)?;
        self.repo.list_user_teams(email)
    }

    /// Links `email` to `team`. A no-op when the link already exists.
    pub fn assign_team_to_user(&self, email: &str, team: &str) -> RepoResult<()> {
        let email = require_text("email", email)?;
        let team = require_text("team", team)?;
        self.repo.assign_team(email, team)
    }

    /// Unlinks `email` from `team`. A no-op when no link exists.
    pub fn remove_team_from_user(&self, email: &str, team: &str) -> RepoResult<()> {
        let email = require_text("email", email)?;
        let team = require_text("team", team)?;
        self.repo.remove_team(email, team)
    }

    /// Replaces the goal statement shown to reviewers.
    pub fn set_goal(&self, email: &str, goal: &str) -> RepoResult<()> {
        let email = require_text("email", email)?;
        let goal = require_text("goal", goal)?;
        self.repo.set_goal(email, goal)
    }
}
