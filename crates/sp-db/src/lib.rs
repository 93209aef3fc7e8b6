//! # sp-db
//!
//! libSQL vote store for Schelling Point.
//!
//! Holds the relational state: proposed sessions, per-participant vote rows,
//! and the per-session aggregate (`total_votes`, `voter_count`,
//! `total_credits`). The aggregate columns are kept in step with the vote rows
//! by SQL triggers, so every vote write updates them in the same statement.
//!
//! Uses the `libsql` crate (C `SQLite` fork, v0.9.29) as a local embedded database.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle for all vote store operations.
pub struct SpDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl SpDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let sp_db = Self { db, conn };
        sp_db.run_migrations().await?;
        Ok(sp_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"ses-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    async fn test_db() -> SpDb {
        SpDb::open_local(":memory:").await.unwrap()
    }

    async fn exists(db: &SpDb, kind: &str, name: &str) -> bool {
        let mut rows = db
            .conn()
            .query(
                "SELECT name FROM sqlite_master WHERE type = ?1 AND name = ?2",
                [kind, name],
            )
            .await
            .unwrap();
        rows.next().await.unwrap().is_some()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;
        for table in ["sessions", "votes"] {
            assert!(exists(&db, "table", table).await, "table '{table}' should exist");
        }
        for trigger in ["votes_ai", "votes_au", "votes_ad"] {
            assert!(
                exists(&db, "trigger", trigger).await,
                "trigger '{trigger}' should exist"
            );
        }
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
        assert!(exists(&db, "table", "votes").await);
    }

    #[tokio::test]
    async fn foreign_keys_enabled() {
        let db = test_db().await;
        let mut rows = db.conn().query("PRAGMA foreign_keys", ()).await.unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 1);
    }

    #[tokio::test]
    async fn generate_id_correct_format() {
        let db = test_db().await;
        let id = db.generate_id("ses").await.unwrap();
        assert!(id.starts_with("ses-"), "ID should start with 'ses-': {id}");
        assert_eq!(id.len(), 12, "ID should be 12 chars: {id}");
        assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn generate_id_unique() {
        let db = test_db().await;
        let mut ids = HashSet::new();
        for _ in 0..100 {
            assert!(ids.insert(db.generate_id("ses").await.unwrap()));
        }
    }

    #[tokio::test]
    async fn vote_check_rejects_inconsistent_cost() {
        let db = test_db().await;
        db.conn()
            .execute(
                "INSERT INTO sessions (id, title, status) VALUES ('ses-1', 'Intro', 'approved')",
                (),
            )
            .await
            .unwrap();

        let bad_cost = db
            .conn()
            .execute(
                "INSERT INTO votes (participant_id, session_id, vote_count, credits_spent)
                 VALUES ('usr-1', 'ses-1', 3, 6)",
                (),
            )
            .await;
        assert!(bad_cost.is_err());

        let zero_votes = db
            .conn()
            .execute(
                "INSERT INTO votes (participant_id, session_id, vote_count, credits_spent)
                 VALUES ('usr-1', 'ses-1', 0, 0)",
                (),
            )
            .await;
        assert!(zero_votes.is_err());
    }
}
