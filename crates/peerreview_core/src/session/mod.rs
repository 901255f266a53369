//! In-memory session credential store.
//!
//! # Responsibility
//! - Map opaque session keys to `(email, expiry)` pairs.
//! - Validate keys without side effects.
//! - Drop expired entries on demand (`prune`) or on a timer (`SessionPruner`).
//!
//! # Invariants
//! - Every read and write, including the rebuild done by `prune`, happens
//!   under one mutex.
//! - A session is valid strictly before its expiry instant and invalid at or
//!   after it.
//! - Keys and identities are never empty.

use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

mod clock;
mod key;
mod pruner;

pub use clock::{Clock, SystemClock};
pub use key::{generate_session_key, SESSION_KEY_ALPHABET, SESSION_KEY_LENGTH};
pub use pruner::SessionPruner;

/// Rejected `issue` input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    EmptyKey,
    EmptyIdentity,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyKey => write!(f, "session key must not be empty"),
            Self::EmptyIdentity => write!(f, "session identity must not be empty"),
        }
    }
}

impl Error for SessionError {}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SessionEntry {
    email: String,
    /// Unix epoch milliseconds.
    expires_at_ms: i64,
}

/// Lock-guarded map from session key to identity and expiry.
pub struct SessionStore {
    entries: Mutex<HashMap<String, SessionEntry>>,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    /// Creates an empty store reading time from the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store reading time from `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Current time according to the store's clock, in epoch milliseconds.
    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// Stores `key -> (email, expires_at_ms)`, replacing any existing entry.
    ///
    /// Key uniqueness is not checked; callers supply keys from
    /// `generate_session_key`.
    pub fn issue(&self, key: &str, email: &str, expires_at_ms: i64) -> Result<(), SessionError> {
        if key.is_empty() {
            return Err(SessionError::EmptyKey);
        }
        if email.is_empty() {
            return Err(SessionError::EmptyIdentity);
        }

        self.lock().insert(
            key.to_string(),
            SessionEntry {
                email: email.to_string(),
                expires_at_ms,
            },
        );
        Ok(())
    }

    /// Issues a session that expires `ttl` from now. Returns the expiry.
    pub fn issue_for(&self, key: &str, email: &str, ttl: Duration) -> Result<i64, SessionError> {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let expires_at_ms = self.now_ms().saturating_add(ttl_ms);
        self.issue(key, email, expires_at_ms)?;
        Ok(expires_at_ms)
    }

    /// Returns the identity bound to `key` if the session exists and has not
    /// expired. Expired entries stay in place until the next `prune`.
    pub fn validate(&self, key: &str) -> Option<String> {
        let now = self.now_ms();
        let entries = self.lock();
        entries
            .get(key)
            .filter(|entry| now < entry.expires_at_ms)
            .map(|entry| entry.email.clone())
    }

    /// Removes every entry whose expiry is at or before now.
    ///
    /// Returns the number of removed entries.
    pub fn prune(&self) -> usize {
        let now = self.now_ms();
        let mut entries = self.lock();
        let before = entries.len();
        let live: HashMap<String, SessionEntry> = entries
            .drain()
            .filter(|(_, entry)| entry.expires_at_ms > now)
            .collect();
        *entries = live;
        before - entries.len()
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // The map is never left half-updated, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts a `SystemTime` to epoch milliseconds, clamping pre-epoch values to 0.
pub fn epoch_ms(time: SystemTime) -> i64 {
    time.duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
