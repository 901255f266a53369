//! Review request and anonymous feedback persistence.
//!
//! # Responsibility
//! - Record reviewer grants (`review_requests`).
//! - Answer the two eligibility queries: teammates and requested reviewers.
//! - Insert and read feedback rows.
//!
//! # Invariants
//! - Feedback rows are written without any reviewer reference; the read path
//!   returns `FeedbackItem`, which has no field that could hold one.
//! - A feedback batch is inserted in one transaction: all rows or none.
//! - Duplicate review requests are accepted and collapse on read.

use crate::model::review::{FeedbackItem, FeedbackKind};
use crate::model::user::UserSummary;
use crate::repo::cycle_repo::cycle_id;
use crate::repo::user_repo::user_id;
use crate::repo::{RepoError, RepoResult, StorageContext};
use rusqlite::{params, Connection};

/// Repository interface for review requests and feedback.
pub trait ReviewRepository {
    /// Grants `reviewer` permission to review `recipient` during `cycle`.
    fn add_review_request(&self, recipient: &str, reviewer: &str, cycle: &str) -> RepoResult<()>;
    /// Users sharing at least one team with `email`, excluding `email`.
    fn list_teammates(&self, email: &str) -> RepoResult<Vec<UserSummary>>;
    /// Users named as reviewer for `email` in `cycle`, excluding `email`.
    fn list_requested_reviewers(&self, email: &str, cycle: &str) -> RepoResult<Vec<UserSummary>>;
    /// Inserts one row per item for `(recipient, cycle)`.
    fn insert_feedback(
        &self,
        recipient: &str,
        cycle: &str,
        items: &[(FeedbackKind, &str)],
    ) -> RepoResult<usize>;
    /// Every feedback row addressed to `recipient`, across all cycles.
    fn list_feedback(&self, recipient: &str) -> RepoResult<Vec<FeedbackItem>>;
}

/// SQLite-backed review repository.
pub struct SqliteReviewRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReviewRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ReviewRepository for SqliteReviewRepository<'_> {
    fn add_review_request(&self, recipient: &str, reviewer: &str, cycle: &str) -> RepoResult<()> {
        let recipient_id = user_id(self.conn, recipient)?;
        let reviewer_id = user_id(self.conn, reviewer)?;
        let cycle_id = cycle_id(self.conn, cycle)?;

        self.conn
            .execute(
                "INSERT INTO review_requests (recipient_id, reviewer_id, cycle_id)
                 VALUES (?1, ?2, ?3);",
                params![recipient_id, reviewer_id, cycle_id],
            )
            .during("add_review_request")?;
        Ok(())
    }

    fn list_teammates(&self, email: &str) -> RepoResult<Vec<UserSummary>> {
        query_summaries(
            self.conn,
            "list_teammates",
            "SELECT DISTINCT mate.name, mate.email
             FROM users me
             JOIN user_teams mine ON mine.user_id = me.id
             JOIN user_teams theirs ON theirs.team_id = mine.team_id
             JOIN users mate ON mate.id = theirs.user_id
             WHERE me.email = ?1
               AND mate.id <> me.id;",
            params![email],
        )
    }

    fn list_requested_reviewers(&self, email: &str, cycle: &str) -> RepoResult<Vec<UserSummary>> {
        query_summaries(
            self.conn,
            "list_requested_reviewers",
            "SELECT DISTINCT reviewer.name, reviewer.email
             FROM review_requests rr
             JOIN users recipient ON recipient.id = rr.recipient_id
             JOIN users reviewer ON reviewer.id = rr.reviewer_id
             JOIN review_cycles c ON c.id = rr.cycle_id
             WHERE recipient.email = ?1
               AND c.name = ?2
               AND reviewer.id <> recipient.id;",
            params![email, cycle],
        )
    }

    fn insert_feedback(
        &self,
        recipient: &str,
        cycle: &str,
        items: &[(FeedbackKind, &str)],
    ) -> RepoResult<usize> {
        let recipient_id = user_id(self.conn, recipient)?;
        let cycle_id = cycle_id(self.conn, cycle)?;

        let tx = self
            .conn
            .unchecked_transaction()
            .during("insert_feedback")?;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO reviews (recipient_id, review_cycle_id, feedback, kind)
                     VALUES (?1, ?2, ?3, ?4);",
                )
                .during("insert_feedback")?;
            for (kind, text) in items {
                stmt.execute(params![recipient_id, cycle_id, text, kind.as_str()])
                    .during("insert_feedback")?;
            }
        }
        tx.commit().during("insert_feedback")?;
        Ok(items.len())
    }

    fn list_feedback(&self, recipient: &str) -> RepoResult<Vec<FeedbackItem>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT c.name, r.feedback, r.kind
                 FROM reviews r
                 JOIN users u ON r.recipient_id = u.id
                 JOIN review_cycles c ON c.id = r.review_cycle_id
                 WHERE u.email = ?1;",
            )
            .during("list_feedback")?;
        let mut rows = stmt.query([recipient]).during("list_feedback")?;
        let mut items = Vec::new();
        while let Some(row) = rows.next().during("list_feedback")? {
            let kind_text: String = row.get(2).during("list_feedback")?;
            let kind = FeedbackKind::parse(&kind_text).ok_or_else(|| {
                RepoError::InvalidData(format!("invalid feedback kind `{kind_text}` in reviews.kind"))
            })?;
            items.push(FeedbackItem {
                cycle: row.get(0).during("list_feedback")?,
                text: row.get(1).during("list_feedback")?,
                kind,
            });
        }
        Ok(items)
    }
}

fn query_summaries(
    conn: &Connection,
    operation: &'static str,
    sql: &str,
    params: &[&dyn rusqlite::ToSql],
) -> RepoResult<Vec<UserSummary>> {
    let mut stmt = conn.prepare(sql).during(operation)?;
    let summaries = stmt
        .query_map(params, |row| {
            Ok(UserSummary {
                name: row.get(0)?,
                email: row.get(1)?,
            })
        })
        .during(operation)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .during(operation)?;
    Ok(summaries)
}
