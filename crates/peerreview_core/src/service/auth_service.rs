//! Sign-in: turns a verified identity into a session.
//!
//! # Responsibility
//! - Create the user row on first sign-in.
//! - Generate and issue a session key with the configured lifetime.
//!
//! # Invariants
//! - The user row exists before the session key is handed out.
//! - The issued key is never logged.

use crate::model::validation::{require_email, ValidationError};
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoError;
use crate::session::{generate_session_key, SessionError, SessionStore};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

/// Default session lifetime.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Issued session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignIn {
    pub session_key: String,
    /// Unix epoch milliseconds.
    pub expires_at_ms: i64,
}

/// Sign-in failure.
#[derive(Debug)]
pub enum SignInError {
    Validation(ValidationError),
    Repo(RepoError),
    Session(SessionError),
}

impl Display for SignInError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Session(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SignInError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Session(err) => Some(err),
        }
    }
}

impl From<ValidationError> for SignInError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for SignInError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<SessionError> for SignInError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

/// Sign-in use-case service.
pub struct AuthService<R: UserRepository> {
    repo: R,
    sessions: Arc<SessionStore>,
    session_ttl: Duration,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(repo: R, sessions: Arc<SessionStore>, session_ttl: Duration) -> Self {
        Self {
            repo,
            sessions,
            session_ttl,
        }
    }

    /// Signs in an identity already verified by the identity provider.
    ///
    /// # Contract
    /// - Creates the user when missing; an existing user is left unchanged.
    /// - Returns a fresh session key valid for the configured lifetime.
    pub fn sign_in(&self, verified_email: &str, display_name: &str) -> Result<SignIn, SignInError> {
        let email = require_email("email", verified_email)?;

        if let Err(err) = self.repo.create_user(display_name.trim(), email) {
            error!(
                "event=sign_in module=auth status=error error_code=create_user_failed error={err}"
            );
            return Err(err.into());
        }

        let session_key = generate_session_key();
        let expires_at_ms = self
            .sessions
            .issue_for(&session_key, email, self.session_ttl)?;

        info!("event=sign_in module=auth status=ok expires_at_ms={expires_at_ms}");
        Ok(SignIn {
            session_key,
            expires_at_ms,
        })
    }
}
