//! Schema versioning for the review database.
//!
//! Each step in `STEPS` moves `PRAGMA user_version` forward by exactly one.
//! Pending steps run inside one transaction, so a failed upgrade leaves the
//! file at its previous version. Uniqueness of emails, team names, cycle
//! names and user-team links lives in the schema itself.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

/// SQL for each schema version, index `n` producing version `n + 1`.
const STEPS: &[(&str, &str)] = &[("init", include_str!("0001_init.sql"))];

/// Where a database stands relative to this binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaState {
    Current,
    Behind { from: u32 },
    Ahead { found: u32 },
}

/// Schema version produced by running every known step.
pub fn latest_version() -> u32 {
    u32::try_from(STEPS.len()).unwrap_or(u32::MAX)
}

/// Compares the stored `user_version` with `latest_version()`.
pub fn schema_state(conn: &Connection) -> DbResult<SchemaState> {
    let found = current_user_version(conn)?;
    let latest = latest_version();
    Ok(match found {
        v if v == latest => SchemaState::Current,
        v if v < latest => SchemaState::Behind { from: v },
        v => SchemaState::Ahead { found: v },
    })
}

/// Brings the schema up to `latest_version()`.
///
/// Refuses databases written by a newer binary.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = match schema_state(conn)? {
        SchemaState::Current => return Ok(()),
        SchemaState::Ahead { found } => {
            return Err(DbError::UnsupportedSchemaVersion {
                db_version: found,
                latest_supported: latest_version(),
            })
        }
        SchemaState::Behind { from } => from,
    };

    let tx = conn.transaction()?;
    for (version, (label, sql)) in (1u32..).zip(STEPS).skip(from as usize) {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
        debug!("event=db_migrate_step module=db status=ok version={version} step={label}");
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={from} to_version={}",
        latest_version()
    );
    Ok(())
}

/// Reads the schema version recorded in `PRAGMA user_version`.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?)
}
