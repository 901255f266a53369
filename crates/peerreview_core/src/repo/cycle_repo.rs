//! Review cycle repository contracts and SQLite implementation.
//!
//! # Invariants
//! - `review_cycles.name` is unique; new cycles start open.
//! - Deleting a cycle referenced by reviews or review requests fails with
//!   `RepoError::InUse`; deleting an absent cycle is a no-op.

use crate::model::cycle::Cycle;
use crate::repo::{
    bool_to_int, delete_error, int_to_bool, not_found, Entity, RepoResult, StorageContext,
};
use rusqlite::{params, Connection, OptionalExtension};

/// Repository interface for review cycles.
pub trait CycleRepository {
    fn list_cycles(&self) -> RepoResult<Vec<Cycle>>;
    fn get_cycle(&self, name: &str) -> RepoResult<Option<Cycle>>;
    fn add_cycle(&self, name: &str) -> RepoResult<()>;
    fn set_cycle_open(&self, name: &str, is_open: bool) -> RepoResult<()>;
    fn delete_cycle(&self, name: &str) -> RepoResult<()>;
}

/// SQLite-backed cycle repository.
pub struct SqliteCycleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCycleRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CycleRepository for SqliteCycleRepository<'_> {
    fn list_cycles(&self) -> RepoResult<Vec<Cycle>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, is_open FROM review_cycles ORDER BY id ASC;")
            .during("list_cycles")?;
        let mut rows = stmt.query([]).during("list_cycles")?;
        let mut cycles = Vec::new();
        while let Some(row) = rows.next().during("list_cycles")? {
            let is_open: i64 = row.get(1).during("list_cycles")?;
            cycles.push(Cycle {
                name: row.get(0).during("list_cycles")?,
                is_open: int_to_bool("review_cycles.is_open", is_open)?,
            });
        }
        Ok(cycles)
    }

    fn get_cycle(&self, name: &str) -> RepoResult<Option<Cycle>> {
        let is_open = self
            .conn
            .query_row(
                "SELECT is_open FROM review_cycles WHERE name = ?1;",
                [name],
                |row| row.get::<_, i64>(0),
            )
            .optional()
            .during("get_cycle")?;
        match is_open {
            Some(value) => Ok(Some(Cycle {
                name: name.to_string(),
                is_open: int_to_bool("review_cycles.is_open", value)?,
            })),
            None => Ok(None),
        }
    }

    fn add_cycle(&self, name: &str) -> RepoResult<()> {
        self.conn
            .execute(
                "INSERT INTO review_cycles (name, is_open)
                 VALUES (?1, 1)
                 ON CONFLICT(name) DO NOTHING;",
                [name],
            )
            .during("add_cycle")?;
        Ok(())
    }

    fn set_cycle_open(&self, name: &str, is_open: bool) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE review_cycles SET is_open = ?1 WHERE name = ?2;",
                params![bool_to_int(is_open), name],
            )
            .during("set_cycle_open")?;
        if changed == 0 {
            return Err(not_found(Entity::Cycle, name));
        }
        Ok(())
    }

    fn delete_cycle(&self, name: &str) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM review_cycles WHERE name = ?1;", [name])
            .map_err(delete_error(Entity::Cycle, name, "delete_cycle"))?;
        Ok(())
    }
}

/// Resolves `review_cycles.id` for a cycle name.
pub(crate) fn cycle_id(conn: &Connection, name: &str) -> RepoResult<i64> {
    conn.query_row(
        "SELECT id FROM review_cycles WHERE name = ?1;",
        [name],
        |row| row.get::<_, i64>(0),
    )
    .optional()
    .during("lookup_cycle")?
    .ok_or_else(|| not_found(Entity::Cycle, name))
}
