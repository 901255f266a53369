//! Team repository contracts and SQLite implementation.
//!
//! # Invariants
//! - `teams.name` is unique; adding an existing team is a no-op.
//! - Deleting an absent team is a no-op; deleting a team with members
//!   fails with `RepoError::InUse`.

use crate::repo::{delete_error, Entity, RepoResult, StorageContext};
use rusqlite::Connection;

/// Repository interface for team reference data.
pub trait TeamRepository {
    fn list_teams(&self) -> RepoResult<Vec<String>>;
    fn add_team(&self, name: &str) -> RepoResult<()>;
    fn delete_team(&self, name: &str) -> RepoResult<()>;
}

/// SQLite-backed team repository.
pub struct SqliteTeamRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTeamRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TeamRepository for SqliteTeamRepository<'_> {
    fn list_teams(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM teams ORDER BY name ASC;")
            .during("list_teams")?;
        let teams = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .during("list_teams")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .during("list_teams")?;
        Ok(teams)
    }

    fn add_team(&self, name: &str) -> RepoResult<()> {
        self.conn
            .execute(
                "INSERT INTO teams (name) VALUES (?1) ON CONFLICT(name) DO NOTHING;",
                [name],
            )
            .during("add_team")?;
        Ok(())
    }

    fn delete_team(&self, name: &str) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM teams WHERE name = ?1;", [name])
            .map_err(delete_error(Entity::Team, name, "delete_team"))?;
        Ok(())
    }
}
