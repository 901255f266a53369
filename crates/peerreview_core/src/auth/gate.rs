//! Session gate in front of every protected operation.
//!
//! # Invariants
//! - Unauthenticated requests never reach the wrapped operation.
//! - A resolved identity is never empty; an empty one aborts the request as
//!   an invariant violation rather than being treated as "no identity".
//! - Session keys are never written to logs.

use super::RequestCredentials;
use crate::session::SessionStore;
use log::{debug, error, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use uuid::Uuid;

/// Lookup side of a credential store.
pub trait CredentialStore: Send + Sync {
    /// Identity bound to `key` when the session is live.
    fn validate(&self, key: &str) -> Option<String>;
}

impl CredentialStore for SessionStore {
    fn validate(&self, key: &str) -> Option<String> {
        SessionStore::validate(self, key)
    }
}

/// Why a request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthenticatedReason {
    /// Neither cookie nor header carried a key.
    MissingCredential,
    /// The key is unknown or its session has expired.
    InvalidCredential,
}

/// Gate failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Non-fatal: the caller must sign in again.
    Unauthenticated(UnauthenticatedReason),
    /// Internal inconsistency; the request is aborted and must not be retried.
    InvariantViolation(String),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated(UnauthenticatedReason::MissingCredential) => {
                write!(f, "unauthenticated: no session credential")
            }
            Self::Unauthenticated(UnauthenticatedReason::InvalidCredential) => {
                write!(f, "unauthenticated: unknown or expired session")
            }
            Self::InvariantViolation(detail) => write!(f, "invariant violation: {detail}"),
        }
    }
}

impl Error for AuthError {}

/// Error from `AccessGate::guard`: either the gate or the operation failed.
#[derive(Debug)]
pub enum GuardedError<E> {
    Auth(AuthError),
    Operation(E),
}

impl<E: Display> Display for GuardedError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auth(err) => write!(f, "{err}"),
            Self::Operation(err) => write!(f, "{err}"),
        }
    }
}

impl<E: Error + 'static> Error for GuardedError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Auth(err) => Some(err),
            Self::Operation(err) => Some(err),
        }
    }
}

/// Identity attached to an accepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedRequest {
    request_id: Uuid,
    email: String,
}

impl AuthenticatedRequest {
    /// Correlation id used in log lines for this request.
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Verified, non-empty email of the caller.
    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Resolves request credentials to an identity.
pub struct AccessGate<S: CredentialStore = SessionStore> {
    store: Arc<S>,
}

impl<S: CredentialStore> AccessGate<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Accepts or rejects a request.
    pub fn authorize(
        &self,
        credentials: &RequestCredentials,
    ) -> Result<AuthenticatedRequest, AuthError> {
        let request_id = Uuid::new_v4();

        let Some(key) = credentials.session_key() else {
            debug!(
                "event=auth_check module=auth status=denied reason=missing_credential request_id={request_id}"
            );
            return Err(AuthError::Unauthenticated(
                UnauthenticatedReason::MissingCredential,
            ));
        };

        let Some(email) = self.store.validate(key) else {
            warn!(
                "event=auth_check module=auth status=denied reason=invalid_credential request_id={request_id}"
            );
            return Err(AuthError::Unauthenticated(
                UnauthenticatedReason::InvalidCredential,
            ));
        };

        if email.is_empty() {
            error!(
                "event=auth_check module=auth status=error error_code=empty_identity request_id={request_id}"
            );
            return Err(AuthError::InvariantViolation(format!(
                "session resolved to an empty identity (request_id={request_id})"
            )));
        }

        debug!("event=auth_check module=auth status=ok request_id={request_id} email={email}");
        Ok(AuthenticatedRequest { request_id, email })
    }

    /// Runs `operation` only for an accepted request.
    pub fn guard<T, E, F>(
        &self,
        credentials: &RequestCredentials,
        operation: F,
    ) -> Result<T, GuardedError<E>>
    where
        F: FnOnce(&AuthenticatedRequest) -> Result<T, E>,
    {
        let request = self.authorize(credentials).map_err(GuardedError::Auth)?;
        operation(&request).map_err(GuardedError::Operation)
    }
}

#[cfg(test)]
mod tests {
    use super::{AccessGate, AuthError, CredentialStore, GuardedError, UnauthenticatedReason};
    use crate::auth::RequestCredentials;
    use crate::session::SessionStore;
    use std::cell::Cell;
    use std::sync::Arc;

    struct EmptyIdentityStore;

    impl CredentialStore for EmptyIdentityStore {
        fn validate(&self, _key: &str) -> Option<String> {
            Some(String::new())
        }
    }

    fn store_with(key: &str, email: &str, expires_at_ms: i64) -> Arc<SessionStore> {
        let store = Arc::new(SessionStore::new());
        store.issue(key, email, expires_at_ms).expect("issue");
        store
    }

    #[test]
    fn valid_cookie_yields_identity() {
        let gate = AccessGate::new(store_with("key-1", "a@x.com", i64::MAX));
        let request = gate
            .authorize(&RequestCredentials::from_cookie("key-1"))
            .expect("accepted");
        assert_eq!(request.email(), "a@x.com");
    }

    #[test]
    fn header_is_used_when_cookie_missing() {
        let gate = AccessGate::new(store_with("key-1", "a@x.com", i64::MAX));
        let request = gate
            .authorize(&RequestCredentials::from_header("key-1"))
            .expect("accepted");
        assert_eq!(request.email(), "a@x.com");
    }

    #[test]
    fn missing_unknown_and_expired_are_unauthenticated() {
        let store = store_with("live", "a@x.com", i64::MAX);
        store.issue("stale", "b@x.com", 0).expect("issue");
        let gate = AccessGate::new(store);

        assert_eq!(
            gate.authorize(&RequestCredentials::default()),
            Err(AuthError::Unauthenticated(
                UnauthenticatedReason::MissingCredential
            ))
        );
        for key in ["unknown", "stale"] {
            assert_eq!(
                gate.authorize(&RequestCredentials::from_cookie(key)),
                Err(AuthError::Unauthenticated(
                    UnauthenticatedReason::InvalidCredential
                ))
            );
        }
    }

    #[test]
    fn invalid_cookie_does_not_fall_back_to_header() {
        let gate = AccessGate::new(store_with("good", "a@x.com", i64::MAX));
        let credentials = RequestCredentials {
            cookie: Some("bad".to_string()),
            header: Some("good".to_string()),
        };
        assert!(gate.authorize(&credentials).is_err());
    }

    #[test]
    fn empty_identity_is_an_invariant_violation() {
        let gate = AccessGate::new(Arc::new(EmptyIdentityStore));
        let err = gate
            .authorize(&RequestCredentials::from_cookie("anything"))
            .expect_err("must abort");
        assert!(matches!(err, AuthError::InvariantViolation(_)));
    }

    #[test]
    fn guard_skips_operation_when_denied() {
        let gate = AccessGate::new(Arc::new(SessionStore::new()));
        let ran = Cell::new(false);

        let result: Result<(), GuardedError<std::io::Error>> =
            gate.guard(&RequestCredentials::from_cookie("nope"), |_| {
                ran.set(true);
                Ok(())
            });

        assert!(matches!(result, Err(GuardedError::Auth(_))));
        assert!(!ran.get());
    }

    #[test]
    fn guard_passes_identity_to_operation() {
        let gate = AccessGate::new(store_with("key-1", "a@x.com", i64::MAX));
        let email: Result<String, GuardedError<std::io::Error>> = gate
            .guard(&RequestCredentials::from_cookie("key-1"), |request| {
                Ok(request.email().to_string())
            });
        assert_eq!(email.expect("accepted"), "a@x.com");
    }
}
