//! Session aggregate repair.
//!
//! The triggers keep each session's `total_votes`, `voter_count`, and
//! `total_credits` in step with its vote rows. `rebuild_aggregates` recomputes
//! them from scratch for when the cached columns are suspected to have drifted
//! (manual edits, restored backups).

use std::collections::HashMap;
use std::time::Instant;

use sp_core::entities::{SessionTally, Vote};
use sp_core::responses::RebuildResponse;

use crate::error::DatabaseError;
use crate::helpers::to_sql_int;
use crate::repos::session::all_sessions;
use crate::repos::vote::all_votes;
use crate::service::VoteService;

impl VoteService {
    /// Recompute every session's tally from the `votes` table.
    ///
    /// Runs in one transaction; only sessions whose cached tally differs are
    /// written.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if reading or writing fails. Nothing is
    /// changed on error.
    pub async fn rebuild_aggregates(&self) -> Result<RebuildResponse, DatabaseError> {
        let start = Instant::now();
        let tx = self.db().conn().transaction().await?;

        let sessions = all_sessions(&tx).await?;
        let mut by_session: HashMap<String, Vec<Vote>> = HashMap::new();
        for vote in all_votes(&tx).await? {
            by_session.entry(vote.session_id.clone()).or_default().push(vote);
        }

        let mut corrected = 0u32;
        for session in &sessions {
            let actual = by_session
                .get(&session.id)
                .map_or_else(SessionTally::default, |votes| SessionTally::from_votes(votes));
            let cached = session.tally();
            if cached == actual {
                continue;
            }

            tracing::warn!(
                session_id = %session.id,
                cached_votes = cached.total_votes,
                actual_votes = actual.total_votes,
                cached_voters = cached.voter_count,
                actual_voters = actual.voter_count,
                "session aggregate drifted; correcting"
            );
            tx.execute(
                "UPDATE sessions SET total_votes = ?1, voter_count = ?2, total_credits = ?3
                 WHERE id = ?4",
                libsql::params![
                    to_sql_int(actual.total_votes, "total_votes")?,
                    to_sql_int(actual.voter_count, "voter_count")?,
                    to_sql_int(actual.total_credits, "total_credits")?,
                    session.id.as_str()
                ],
            )
            .await?;
            corrected += 1;
        }

        tx.commit().await?;

        let response = RebuildResponse {
            rebuilt: true,
            sessions_checked: u32::try_from(sessions.len()).unwrap_or(u32::MAX),
            sessions_corrected: corrected,
            duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        };
        tracing::info!(
            checked = response.sessions_checked,
            corrected = response.sessions_corrected,
            "aggregates rebuilt"
        );
        Ok(response)
    }
}
