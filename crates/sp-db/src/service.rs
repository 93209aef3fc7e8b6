//! Service layer over the vote store.
//!
//! `VoteService` wraps `SpDb`. All repo methods are implemented as
//! `impl VoteService` blocks in [`crate::repos`].

use crate::SpDb;
use crate::error::DatabaseError;

/// Entry point for session and vote operations.
pub struct VoteService {
    db: SpDb,
}

impl VoteService {
    /// Open a service on a local database file, or `":memory:"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or migrated.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = SpDb::open_local(db_path).await?;
        Ok(Self { db })
    }

    /// Create from an existing `SpDb` (for testing).
    #[must_use]
    pub const fn from_db(db: SpDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &SpDb {
        &self.db
    }
}
