//! Database error types for sp-db.

use sp_core::errors::{CoreError, LedgerError};
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or returned unparseable data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., voting on a pending session).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Domain validation or state machine violation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A stored count or amount outside the ledger's domain.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
