//! User repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Create users idempotently on first sign-in.
//! - Read profiles and manage user-team links and goals.
//!
//! # Invariants
//! - `users.email` is unique; a second `create_user` is a no-op.
//! - `user_teams(user_id, team_id)` is unique; assigning twice leaves one link,
//!   including under concurrent callers.

use crate::model::user::UserInfo;
use crate::repo::{not_found, Entity, RepoResult, StorageContext};
use rusqlite::{params, Connection, OptionalExtension};

/// Repository interface for users and their team membership.
pub trait UserRepository {
    fn create_user(&self, name: &str, email: &str) -> RepoResult<()>;
    fn get_user(&self, email: &str) -> RepoResult<Option<UserInfo>>;
    fn list_user_teams(&self, email: &str) -> RepoResult<Vec<String>>;
    fn assign_team(&self, email: &str, team: &str) -> RepoResult<()>;
    fn remove_team(&self, email: &str, team: &str) -> RepoResult<()>;
    fn set_goal(&self, email: &str, goal: &str) -> RepoResult<()>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, name: &str, email: &str) -> RepoResult<()> {
        self.conn
            .execute(
                "INSERT INTO users (name, email)
                 VALUES (?1, ?2)
                 ON CONFLICT(email) DO NOTHING;",
                params![name, email],
            )
            .during("create_user")?;
        Ok(())
    }

    fn get_user(&self, email: &str) -> RepoResult<Option<UserInfo>> {
        let profile = self
            .conn
            .query_row(
                "SELECT name, goals FROM users WHERE email = ?1;",
                [email],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()
            .during("get_user")?;

        let Some((name, goals)) = profile else {
            return Ok(None);
        };

        Ok(Some(UserInfo {
            name,
            email: email.to_string(),
            goals,
            teams: self.list_user_teams(email)?,
        }))
    }

    fn list_user_teams(&self, email: &str) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT t.name
                 FROM teams t
                 JOIN user_teams ut ON ut.team_id = t.id
                 JOIN users u ON ut.user_id = u.id
                 WHERE u.email = ?1
                 ORDER BY t.name ASC;",
            )
            .during("list_user_teams")?;
        let teams = stmt
            .query_map([email], |row| row.get::<_, String>(0))
            .during("list_user_teams")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .during("list_user_teams")?;
        Ok(teams)
    }

    fn assign_team(&self, email: &str, team: &str) -> RepoResult<()> {
        let inserted = self
            .conn
            .execute(
                "INSERT INTO user_teams (user_id, team_id)
                 SELECT u.id, t.id
                 FROM users u, teams t
                 WHERE u.email = ?1 AND t.name = ?2
                 ON CONFLICT(user_id, team_id) DO NOTHING;",
                params![email, team],
            )
            .during("assign_team")?;

        if inserted == 0 {
            // Either the link already exists (no-op) or a side is missing.
            if !row_exists(self.conn, "SELECT 1 FROM users WHERE email = ?1;", email)
                .during("assign_team")?
            {
                return Err(not_found(Entity::User, email));
            }
            if !row_exists(self.conn, "SELECT 1 FROM teams WHERE name = ?1;", team)
                .during("assign_team")?
            {
                return Err(not_found(Entity::Team, team));
            }
        }
        Ok(())
    }

    fn remove_team(&self, email: &str, team: &str) -> RepoResult<()> {
        self.conn
            .execute(
                "DELETE FROM user_teams
                 WHERE user_id = (SELECT id FROM users WHERE email = ?1)
                   AND team_id = (SELECT id FROM teams WHERE name = ?2);",
                params![email, team],
            )
            .during("remove_team")?;
        Ok(())
    }

    fn set_goal(&self, email: &str, goal: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE users SET goals = ?1 WHERE email = ?2;",
                params![goal, email],
            )
            .during("set_goal")?;
        if changed == 0 {
            return Err(not_found(Entity::User, email));
        }
        Ok(())
    }
}

/// Runs a single-parameter `SELECT 1 ...` and reports whether it matched.
pub(crate) fn row_exists(conn: &Connection, sql: &str, key: &str) -> rusqlite::Result<bool> {
    conn.query_row(sql, [key], |_| Ok(()))
        .optional()
        .map(|found| found.is_some())
}

/// Resolves `users.id` for an email.
pub(crate) fn user_id(conn: &Connection, email: &str) -> RepoResult<i64> {
    conn.query_row("SELECT id FROM users WHERE email = ?1;", [email], |row| {
        row.get::<_, i64>(0)
    })
    .optional()
    .during("lookup_user")?
    .ok_or_else(|| not_found(Entity::User, email))
}

#[cfg(test)]
mod tests {
    use super::{SqliteUserRepository, UserRepository};
    use crate::db::open_db_in_memory;
    use crate::repo::{Entity, RepoError};

    #[test]
    fn create_user_twice_keeps_first_name() {
        let conn = open_db_in_memory().expect("open db");
        let repo = SqliteUserRepository::new(&conn);

        repo.create_user("Ada", "ada@x.com").expect("first create");
        repo.create_user("Someone Else", "ada@x.com")
            .expect("second create is a no-op");

        let user = repo.get_user("ada@x.com").expect("get").expect("exists");
        assert_eq!(user.name, "Ada");
        assert_eq!(user.goals, "");
        assert!(user.teams.is_empty());
    }

    #[test]
    fn assign_team_reports_missing_side() {
        let conn = open_db_in_memory().expect("open db");
        let repo = SqliteUserRepository::new(&conn);
        repo.create_user("Ada", "ada@x.com").expect("create user");

        let err = repo
            .assign_team("ada@x.com", "ghost")
            .expect_err("missing team must fail");
        assert!(matches!(
            err,
            RepoError::NotFound { entity: Entity::Team, ref key } if key == "ghost"
        ));

        conn.execute("INSERT INTO teams (name) VALUES ('eng');", [])
            .expect("insert team");
        let err = repo
            .assign_team("nobody@x.com", "eng")
            .expect_err("missing user must fail");
        assert!(matches!(err, RepoError::NotFound { entity: Entity::User, .. }));
    }

    #[test]
    fn set_goal_on_unknown_user_is_not_found() {
        let conn = open_db_in_memory().expect("open db");
        let repo = SqliteUserRepository::new(&conn);

        let err = repo
            .set_goal("nobody@x.com", "ship it")
            .expect_err("unknown user");
        assert!(matches!(err, RepoError::NotFound { entity: Entity::User, .. }));
    }
}
