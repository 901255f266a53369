//! Core domain logic for the peer-review service.
//!
//! This crate owns the session store that gates authenticated calls, the
//! reviewee eligibility rules, and anonymous feedback storage.

pub mod auth;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod session;

pub use auth::{
    AccessGate, AuthError, AuthenticatedRequest, CredentialStore, GuardedError,
    RequestCredentials, UnauthenticatedReason,
};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LogInitError};
pub use model::cycle::Cycle;
pub use model::review::{CycleReviews, FeedbackItem, FeedbackKind};
pub use model::user::{UserInfo, UserSummary};
pub use model::validation::ValidationError;
pub use repo::cycle_repo::{CycleRepository, SqliteCycleRepository};
pub use repo::review_repo::{ReviewRepository, SqliteReviewRepository};
pub use repo::team_repo::{SqliteTeamRepository, TeamRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{Entity, RepoError, RepoResult};
pub use service::auth_service::{AuthService, SignIn, SignInError, DEFAULT_SESSION_TTL};
pub use service::eligibility_service::EligibilityResolver;
pub use service::reference_service::ReferenceDataService;
pub use service::review_service::ReviewAggregator;
pub use service::user_service::UserService;
pub use session::{generate_session_key, Clock, SessionPruner, SessionStore, SystemClock};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
