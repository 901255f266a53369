//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQL details from service orchestration.
//!
//! # Invariants
//! - Idempotent writes rely on schema uniqueness (`ON CONFLICT DO NOTHING`)
//!   instead of read-then-write checks.
//! - Every storage failure carries the name of the operation that hit it.
//! - Deleting a team or cycle that is still referenced surfaces `InUse`.

use crate::db::DbError;
use crate::model::validation::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod cycle_repo;
pub mod review_repo;
pub mod team_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Kind of reference row named in `NotFound`/`InUse` errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Team,
    Cycle,
}

impl Display for Entity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::User => "user",
            Self::Team => "team",
            Self::Cycle => "cycle",
        };
        f.write_str(label)
    }
}

/// Error for repository reads and writes.
#[derive(Debug)]
pub enum RepoError {
    /// Caller input rejected before storage access.
    Validation(ValidationError),
    /// Storage failure, tagged with the failing operation.
    Db {
        operation: &'static str,
        source: DbError,
    },
    /// A referenced user/team/cycle does not exist.
    NotFound { entity: Entity, key: String },
    /// A team/cycle cannot be deleted while other rows reference it.
    InUse { entity: Entity, key: String },
    /// Persisted data cannot be converted into a read model.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db { operation, source } => write!(f, "{operation} failed: {source}"),
            Self::NotFound { entity, key } => write!(f, "{entity} not found: {key}"),
            Self::InUse { entity, key } => write!(f, "{entity} `{key}` is still in use"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db { source, .. } => Some(source),
            Self::NotFound { .. } => None,
            Self::InUse { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Attaches an operation name to a raw SQLite result.
pub(crate) trait StorageContext<T> {
    fn during(self, operation: &'static str) -> RepoResult<T>;
}

impl<T> StorageContext<T> for rusqlite::Result<T> {
    fn during(self, operation: &'static str) -> RepoResult<T> {
        self.map_err(|err| RepoError::Db {
            operation,
            source: DbError::Sqlite(err),
        })
    }
}

/// Maps a failed `DELETE` to `InUse` when a foreign key still points at the row.
pub(crate) fn delete_error<'a>(
    entity: Entity,
    key: &'a str,
    operation: &'static str,
) -> impl FnOnce(rusqlite::Error) -> RepoError + 'a {
    move |err| {
        let source = DbError::Sqlite(err);
        if source.is_foreign_key_violation() {
            RepoError::InUse {
                entity,
                key: key.to_string(),
            }
        } else {
            RepoError::Db { operation, source }
        }
    }
}

pub(crate) fn not_found(entity: Entity, key: &str) -> RepoError {
    RepoError::NotFound {
        entity,
        key: key.to_string(),
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn int_to_bool(column: &str, value: i64) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}
