//! Access control for authenticated operations.
//!
//! # Responsibility
//! - Extract the session key from request credentials.
//! - Resolve it to an identity or reject the request before business logic.
//!
//! # See also
//! - `crate::session` for the credential store.
//! - `crate::service::auth_service` for sign-in.

mod credentials;
mod gate;

pub use credentials::{RequestCredentials, SESSION_COOKIE_NAME, SESSION_HEADER_NAME};
pub use gate::{
    AccessGate, AuthError, AuthenticatedRequest, CredentialStore, GuardedError,
    UnauthenticatedReason,
};
