//! Vote repository: the per-participant vote rows and the budget-gated write path.
//!
//! Raw row access (`upsert_vote`, `delete_vote`, ...) does not consult the
//! budget. Every participant-facing change goes through [`VoteService::cast_vote`]
//! or [`VoteService::set_votes`], which re-read the participant's rows inside a
//! transaction and admit the change through a [`Ballot`] before writing.

use chrono::Utc;

use sp_core::ballot::Ballot;
use sp_core::entities::Vote;
use sp_core::errors::CoreError;
use sp_core::ledger::{Budget, BudgetExceeded, BudgetStatus, VoteChange, VoteWrite, credits_for_votes};
use sp_core::responses::{MyVotesResponse, VoteCastResponse, VoteSummary};

use crate::error::DatabaseError;
use crate::helpers::{get_credits, get_opt_string, get_votes, parse_datetime, parse_enum, to_sql_int};
use crate::repos::session::session_status;
use crate::service::VoteService;

const SELECT_COLS: &str =
    "participant_id, session_id, vote_count, credits_spent, created_at, updated_at";

fn row_to_vote(row: &libsql::Row) -> Result<Vote, DatabaseError> {
    Ok(Vote {
        participant_id: row.get(0)?,
        session_id: row.get(1)?,
        vote_count: get_votes(row, 2, "vote_count")?,
        credits_spent: get_credits(row, 3, "credits_spent")?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
        updated_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

async fn fetch_vote(
    conn: &libsql::Connection,
    participant_id: &str,
    session_id: &str,
) -> Result<Option<Vote>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {SELECT_COLS} FROM votes WHERE participant_id = ?1 AND session_id = ?2"
            ),
            [participant_id, session_id],
        )
        .await?;
    rows.next().await?.map(|row| row_to_vote(&row)).transpose()
}

async fn fetch_votes_where(
    conn: &libsql::Connection,
    column: &str,
    value: &str,
) -> Result<Vec<Vote>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {SELECT_COLS} FROM votes WHERE {column} = ?1 \
                 ORDER BY vote_count DESC, session_id"
            ),
            [value],
        )
        .await?;
    let mut votes = Vec::new();
    while let Some(row) = rows.next().await? {
        votes.push(row_to_vote(&row)?);
    }
    Ok(votes)
}

/// Every vote row, for the aggregate rebuild.
pub(crate) async fn all_votes(conn: &libsql::Connection) -> Result<Vec<Vote>, DatabaseError> {
    let mut rows = conn
        .query(&format!("SELECT {SELECT_COLS} FROM votes"), ())
        .await?;
    let mut votes = Vec::new();
    while let Some(row) = rows.next().await? {
        votes.push(row_to_vote(&row)?);
    }
    Ok(votes)
}

/// Insert or replace one row. `vote_count` must be positive; the cost is
/// always derived from it so the row can never disagree with the price curve.
async fn write_upsert(
    conn: &libsql::Connection,
    participant_id: &str,
    session_id: &str,
    vote_count: u32,
) -> Result<(), DatabaseError> {
    let credits = to_sql_int(credits_for_votes(vote_count), "credits_spent")?;
    let now = Utc::now().to_rfc3339();
    conn.execute(
        &format!(
            "INSERT INTO votes ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?5)
             ON CONFLICT (participant_id, session_id) DO UPDATE SET
                 vote_count = excluded.vote_count,
                 credits_spent = excluded.credits_spent,
                 updated_at = excluded.updated_at"
        ),
        libsql::params![participant_id, session_id, i64::from(vote_count), credits, now],
    )
    .await?;
    Ok(())
}

async fn write_delete(
    conn: &libsql::Connection,
    participant_id: &str,
    session_id: &str,
) -> Result<bool, DatabaseError> {
    let affected = conn
        .execute(
            "DELETE FROM votes WHERE participant_id = ?1 AND session_id = ?2",
            [participant_id, session_id],
        )
        .await?;
    Ok(affected > 0)
}

/// How a gated change expresses the new vote count.
#[derive(Debug, Clone, Copy)]
enum VoteTarget {
    Delta(i64),
    Absolute(u32),
}

/// Result of a budget-gated vote change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The change was admitted and persisted.
    Applied {
        change: VoteChange,
        /// The row after the write; `None` when the row was deleted or never existed.
        vote: Option<Vote>,
        budget: BudgetStatus,
    },
    /// The admission gate refused the change. Nothing was written.
    Rejected {
        rejection: BudgetExceeded,
        budget: BudgetStatus,
    },
}

impl VoteOutcome {
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    #[must_use]
    pub const fn budget(&self) -> &BudgetStatus {
        match self {
            Self::Applied { budget, .. } | Self::Rejected { budget, .. } => budget,
        }
    }

    #[must_use]
    pub fn into_response(self, session_id: impl Into<String>) -> VoteCastResponse {
        let session_id = session_id.into();
        match self {
            Self::Applied { change, budget, .. } => VoteCastResponse::Applied {
                session_id,
                transition: change.transition(),
                change,
                budget,
            },
            Self::Rejected { rejection, budget } => VoteCastResponse::Rejected {
                session_id,
                rejection,
                budget,
            },
        }
    }
}

impl VoteService {
    /// Write a vote row directly, without consulting the budget.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Core` for a zero count (zero-vote rows are
    /// deleted, never stored), or a libSQL error if the session does not exist.
    pub async fn upsert_vote(
        &self,
        participant_id: &str,
        session_id: &str,
        vote_count: u32,
    ) -> Result<Vote, DatabaseError> {
        if vote_count == 0 {
            return Err(CoreError::Validation(
                "vote_count must be positive; delete the vote instead".into(),
            )
            .into());
        }
        write_upsert(self.db().conn(), participant_id, session_id, vote_count).await?;
        fetch_vote(self.db().conn(), participant_id, session_id)
            .await?
            .ok_or(DatabaseError::NoResult)
    }

    /// Remove a vote row. Returns whether a row existed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the delete fails.
    pub async fn delete_vote(
        &self,
        participant_id: &str,
        session_id: &str,
    ) -> Result<bool, DatabaseError> {
        write_delete(self.db().conn(), participant_id, session_id).await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn get_vote(
        &self,
        participant_id: &str,
        session_id: &str,
    ) -> Result<Option<Vote>, DatabaseError> {
        fetch_vote(self.db().conn(), participant_id, session_id).await
    }

    /// All of a participant's vote rows, highest count first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_votes_for_participant(
        &self,
        participant_id: &str,
    ) -> Result<Vec<Vote>, DatabaseError> {
        fetch_votes_where(self.db().conn(), "participant_id", participant_id).await
    }

    /// All vote rows on one session, highest count first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_votes_for_session(&self, session_id: &str) -> Result<Vec<Vote>, DatabaseError> {
        fetch_votes_where(self.db().conn(), "session_id", session_id).await
    }

    /// Sum of `credits_spent` over every session for one participant.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn participant_credits_spent(&self, participant_id: &str) -> Result<u64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT COALESCE(SUM(credits_spent), 0) FROM votes WHERE participant_id = ?1",
                [participant_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        get_credits(&row, 0, "credits_spent")
    }

    /// Build a ballot from the participant's persisted rows.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn load_ballot(
        &self,
        participant_id: &str,
        budget: Budget,
    ) -> Result<Ballot, DatabaseError> {
        let votes = self.list_votes_for_participant(participant_id).await?;
        Ok(Ballot::from_votes(participant_id, budget, &votes))
    }

    /// Change a participant's votes on one session by `delta`.
    ///
    /// A budget rejection is returned as `Ok(VoteOutcome::Rejected)`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` for an unknown session,
    /// `DatabaseError::InvalidState` if the session does not accept votes, or
    /// any storage error. The transaction is rolled back in every error case.
    pub async fn cast_vote(
        &self,
        participant_id: &str,
        session_id: &str,
        delta: i64,
        budget: Budget,
    ) -> Result<VoteOutcome, DatabaseError> {
        self.change_votes(participant_id, session_id, VoteTarget::Delta(delta), budget)
            .await
    }

    /// Set a participant's votes on one session to exactly `target`.
    ///
    /// # Errors
    ///
    /// Same as [`cast_vote`](Self::cast_vote).
    pub async fn set_votes(
        &self,
        participant_id: &str,
        session_id: &str,
        target: u32,
        budget: Budget,
    ) -> Result<VoteOutcome, DatabaseError> {
        self.change_votes(participant_id, session_id, VoteTarget::Absolute(target), budget)
            .await
    }

    /// Apply a change to `ballot` first, then persist it.
    ///
    /// A local refusal is rechecked against a freshly loaded ballot, since
    /// only the store's rows are authoritative. The ballot is reverted if
    /// persistence fails, and resynchronised with the store whenever the
    /// store's rows led to a different result. Once the store has committed,
    /// the outcome is `Applied` even if that resync fails.
    ///
    /// # Errors
    ///
    /// Same as [`cast_vote`](Self::cast_vote).
    pub async fn cast_optimistic(
        &self,
        ballot: &mut Ballot,
        session_id: &str,
        delta: i64,
    ) -> Result<VoteOutcome, DatabaseError> {
        let participant_id = ballot.participant_id().to_string();
        let budget = ballot.budget();

        let pending = if let Ok(pending) = ballot.apply(session_id, delta) {
            pending
        } else {
            tracing::debug!(session_id, "local ballot refused change; reloading");
            *ballot = self.load_ballot(&participant_id, budget).await?;
            match ballot.apply(session_id, delta) {
                Ok(pending) => pending,
                Err(rejection) => {
                    return Ok(VoteOutcome::Rejected {
                        rejection,
                        budget: ballot.status(),
                    });
                }
            }
        };

        match self.cast_vote(&participant_id, session_id, delta, budget).await {
            Ok(VoteOutcome::Applied { change, vote, budget }) => {
                if change != *pending.change() {
                    ballot.sync(session_id, change.new_votes);
                    self.refresh_ballot(ballot).await;
                }
                Ok(VoteOutcome::Applied { change, vote, budget })
            }
            Ok(rejected) => {
                tracing::debug!(session_id, "local ballot was stale; reloading");
                ballot.revert(pending);
                self.refresh_ballot(ballot).await;
                Ok(rejected)
            }
            Err(e) => {
                ballot.revert(pending);
                Err(e)
            }
        }
    }

    /// Replace `ballot` with the store's rows, keeping it as is on failure.
    async fn refresh_ballot(&self, ballot: &mut Ballot) {
        let participant_id = ballot.participant_id().to_string();
        match self.load_ballot(&participant_id, ballot.budget()).await {
            Ok(fresh) => *ballot = fresh,
            Err(e) => {
                tracing::warn!(
                    participant_id = %participant_id,
                    error = %e,
                    "failed to reload ballot"
                );
            }
        }
    }

    /// Summary of a participant's votes joined with session details.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn my_votes(
        &self,
        participant_id: &str,
        budget: Budget,
    ) -> Result<MyVotesResponse, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT v.session_id, s.title, s.format, s.host_name, v.vote_count, v.credits_spent
                 FROM votes v JOIN sessions s ON s.id = v.session_id
                 WHERE v.participant_id = ?1
                 ORDER BY v.vote_count DESC, s.title COLLATE NOCASE",
                [participant_id],
            )
            .await?;

        let mut votes = Vec::new();
        while let Some(row) = rows.next().await? {
            votes.push(VoteSummary {
                session_id: row.get(0)?,
                title: row.get(1)?,
                format: parse_enum(&row.get::<String>(2)?)?,
                host_name: get_opt_string(&row, 3)?,
                vote_count: get_votes(&row, 4, "vote_count")?,
                credits_spent: get_credits(&row, 5, "credits_spent")?,
            });
        }

        let credits_used = votes.iter().map(|v| v.credits_spent).sum::<u64>();
        Ok(MyVotesResponse {
            participant_id: participant_id.to_string(),
            sessions_voted: u32::try_from(votes.len()).unwrap_or(u32::MAX),
            total_votes: votes.iter().map(|v| u64::from(v.vote_count)).sum(),
            credits_used,
            credits_remaining: budget.total().saturating_sub(credits_used),
            votes,
        })
    }

    async fn change_votes(
        &self,
        participant_id: &str,
        session_id: &str,
        target: VoteTarget,
        budget: Budget,
    ) -> Result<VoteOutcome, DatabaseError> {
        let tx = self.db().conn().transaction().await?;

        match gated_write(&tx, participant_id, session_id, target, budget).await {
            Ok(outcome @ VoteOutcome::Applied { .. }) => {
                tx.commit().await?;
                Ok(outcome)
            }
            Ok(rejected) => {
                tx.rollback().await?;
                Ok(rejected)
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    tracing::warn!(%rollback, "rollback after failed vote write failed");
                }
                Err(e)
            }
        }
    }
}

/// Re-read the participant's rows, gate the change, and perform the write.
async fn gated_write(
    conn: &libsql::Connection,
    participant_id: &str,
    session_id: &str,
    target: VoteTarget,
    budget: Budget,
) -> Result<VoteOutcome, DatabaseError> {
    let status = session_status(conn, session_id).await?;
    if !status.is_votable() {
        return Err(DatabaseError::InvalidState(format!(
            "Session {session_id} is {status} and does not accept votes"
        )));
    }

    let rows = fetch_votes_where(conn, "participant_id", participant_id).await?;
    let mut ballot = Ballot::from_votes(participant_id, budget, &rows);
    let delta = match target {
        VoteTarget::Delta(delta) => delta,
        VoteTarget::Absolute(votes) => i64::from(votes) - i64::from(ballot.votes_for(session_id)),
    };

    let pending = match ballot.apply(session_id, delta) {
        Ok(pending) => pending,
        Err(rejection) => {
            tracing::info!(
                participant_id,
                session_id,
                required = rejection.required,
                budget = rejection.budget,
                "vote rejected: budget exceeded"
            );
            return Ok(VoteOutcome::Rejected {
                rejection,
                budget: ballot.status(),
            });
        }
    };
    let change = *pending.change();

    let vote = match change.write() {
        VoteWrite::Upsert { vote_count, .. } => {
            write_upsert(conn, participant_id, session_id, vote_count).await?;
            fetch_vote(conn, participant_id, session_id).await?
        }
        VoteWrite::Delete => {
            write_delete(conn, participant_id, session_id).await?;
            None
        }
        VoteWrite::Noop => fetch_vote(conn, participant_id, session_id).await?,
    };
    tracing::debug!(
        participant_id,
        session_id,
        transition = %change.transition(),
        votes = change.new_votes,
        credits = change.new_credits,
        "vote written"
    );

    Ok(VoteOutcome::Applied {
        change,
        vote,
        budget: ballot.status(),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use sp_core::entities::SessionTally;
    use sp_core::ledger::VoteTransition;

    use super::*;
    use crate::repos::session::SessionProposal;
    use crate::test_support::{approved_session, host, test_service};

    const BUDGET: Budget = Budget::REFERENCE;

    async fn assert_tally_matches(svc: &VoteService, session_id: &str) {
        let votes = svc.list_votes_for_session(session_id).await.unwrap();
        let session = svc.get_session(session_id).await.unwrap();
        assert_eq!(session.tally(), SessionTally::from_votes(&votes));
    }

    #[tokio::test]
    async fn five_increments_from_zero() {
        let svc = test_service().await;
        let ses = approved_session(&svc, "Intro").await;

        let mut spent = Vec::new();
        for _ in 0..5 {
            let outcome = svc.cast_vote("usr-1", &ses, 1, BUDGET).await.unwrap();
            spent.push(outcome.budget().spent);
        }
        assert_eq!(spent, vec![1, 4, 9, 16, 25]);

        let vote = svc.get_vote("usr-1", &ses).await.unwrap().unwrap();
        assert_eq!(vote.vote_count, 5);
        assert_eq!(vote.credits_spent, 25);
        assert_tally_matches(&svc, &ses).await;
    }

    #[tokio::test]
    async fn budget_counts_spend_on_other_sessions() {
        let svc = test_service().await;
        let a = approved_session(&svc, "A").await;
        let b = approved_session(&svc, "B").await;

        // 81 credits on A leaves 19: 4 votes (16) fit on B, a 5th (25) does not.
        svc.set_votes("usr-1", &a, 9, BUDGET).await.unwrap();
        let ok = svc.set_votes("usr-1", &b, 4, BUDGET).await.unwrap();
        assert!(!ok.is_rejected());

        let rejected = svc.cast_vote("usr-1", &b, 1, BUDGET).await.unwrap();
        let VoteOutcome::Rejected { rejection, budget } = rejected else {
            panic!("expected rejection");
        };
        assert_eq!(rejection.required, 81 + 25);
        assert_eq!(budget.spent, 97);
        assert_eq!(svc.participant_credits_spent("usr-1").await.unwrap(), 97);
    }

    #[tokio::test]
    async fn rejection_leaves_store_untouched() {
        let svc = test_service().await;
        let ses = approved_session(&svc, "Intro").await;
        svc.set_votes("usr-1", &ses, 3, BUDGET).await.unwrap();
        let before = svc.get_session(&ses).await.unwrap();

        let outcome = svc.set_votes("usr-1", &ses, 11, BUDGET).await.unwrap();
        assert!(outcome.is_rejected());

        let after = svc.get_session(&ses).await.unwrap();
        assert_eq!(after.tally(), before.tally());
        assert_eq!(
            svc.get_vote("usr-1", &ses).await.unwrap().unwrap().vote_count,
            3
        );
    }

    #[tokio::test]
    async fn decrement_to_zero_deletes_row() {
        let svc = test_service().await;
        let ses = approved_session(&svc, "Intro").await;
        svc.set_votes("usr-1", &ses, 4, BUDGET).await.unwrap();

        let outcome = svc.cast_vote("usr-1", &ses, -1, BUDGET).await.unwrap();
        assert_eq!(outcome.budget().spent, 9);

        let outcome = svc.cast_vote("usr-1", &ses, -10, BUDGET).await.unwrap();
        let VoteOutcome::Applied { change, vote, .. } = outcome else {
            panic!("decrement must be admitted");
        };
        assert_eq!(change.transition(), VoteTransition::Deleted);
        assert_eq!(vote, None);
        assert_eq!(svc.get_vote("usr-1", &ses).await.unwrap(), None);

        let session = svc.get_session(&ses).await.unwrap();
        assert_eq!(session.tally(), SessionTally::default());
    }

    #[tokio::test]
    async fn decrement_without_votes_is_noop() {
        let svc = test_service().await;
        let ses = approved_session(&svc, "Intro").await;
        let outcome = svc.cast_vote("usr-1", &ses, -1, BUDGET).await.unwrap();
        let VoteOutcome::Applied { change, vote, .. } = outcome else {
            panic!("decrement must be admitted");
        };
        assert_eq!(change.transition(), VoteTransition::Unchanged);
        assert_eq!(vote, None);
    }

    #[tokio::test]
    async fn pending_session_refuses_votes() {
        let svc = test_service().await;
        let session = svc
            .propose_session(&host(), &SessionProposal::new("Not yet"))
            .await
            .unwrap();
        let result = svc.cast_vote("usr-1", &session.id, 1, BUDGET).await;
        assert!(matches!(result, Err(DatabaseError::InvalidState(_))));
    }

    #[tokio::test]
    async fn missing_session_is_no_result() {
        let svc = test_service().await;
        let result = svc.cast_vote("usr-1", "ses-missing", 1, BUDGET).await;
        assert!(matches!(result, Err(DatabaseError::NoResult)));
    }

    #[tokio::test]
    async fn triggers_track_many_voters() {
        let svc = test_service().await;
        let ses = approved_session(&svc, "Popular").await;
        let other = approved_session(&svc, "Other").await;

        for (participant, votes) in [("usr-1", 3), ("usr-2", 5), ("usr-3", 1)] {
            svc.set_votes(participant, &ses, votes, BUDGET).await.unwrap();
            svc.set_votes(participant, &other, 2, BUDGET).await.unwrap();
        }
        svc.set_votes("usr-2", &ses, 2, BUDGET).await.unwrap();
        svc.set_votes("usr-3", &ses, 0, BUDGET).await.unwrap();

        let session = svc.get_session(&ses).await.unwrap();
        assert_eq!(session.total_votes, 5);
        assert_eq!(session.voter_count, 2);
        assert_eq!(session.total_credits, 9 + 4);
        assert_tally_matches(&svc, &ses).await;
        assert_tally_matches(&svc, &other).await;
    }

    #[rstest]
    #[case::fits(10, false)]
    #[case::over(11, true)]
    #[tokio::test]
    async fn set_votes_budget_edge(#[case] target: u32, #[case] rejected: bool) {
        let svc = test_service().await;
        let ses = approved_session(&svc, "Edge").await;
        let outcome = svc.set_votes("usr-1", &ses, target, BUDGET).await.unwrap();
        assert_eq!(outcome.is_rejected(), rejected);
    }

    #[tokio::test]
    async fn upsert_rejects_zero_and_overwrites() {
        let svc = test_service().await;
        let ses = approved_session(&svc, "Intro").await;

        assert!(svc.upsert_vote("usr-1", &ses, 0).await.is_err());

        let first = svc.upsert_vote("usr-1", &ses, 2).await.unwrap();
        assert_eq!(first.credits_spent, 4);
        let second = svc.upsert_vote("usr-1", &ses, 6).await.unwrap();
        assert_eq!(second.credits_spent, 36);
        assert_eq!(second.created_at, first.created_at);
        assert_eq!(svc.list_votes_for_session(&ses).await.unwrap().len(), 1);
        assert_tally_matches(&svc, &ses).await;

        assert!(svc.delete_vote("usr-1", &ses).await.unwrap());
        assert!(!svc.delete_vote("usr-1", &ses).await.unwrap());
    }

    #[tokio::test]
    async fn optimistic_ballot_stays_in_sync() {
        let svc = test_service().await;
        let a = approved_session(&svc, "A").await;
        let mut ballot = svc.load_ballot("usr-1", BUDGET).await.unwrap();

        let outcome = svc.cast_optimistic(&mut ballot, &a, 3).await.unwrap();
        assert!(!outcome.is_rejected());
        assert_eq!(ballot.votes_for(&a), 3);
        assert_eq!(ballot.credits_spent(), 9);

        let rejected = svc.cast_optimistic(&mut ballot, &a, 8).await.unwrap();
        assert!(rejected.is_rejected());
        assert_eq!(ballot.votes_for(&a), 3);
    }

    #[tokio::test]
    async fn optimistic_ballot_reverts_on_failure() {
        let svc = test_service().await;
        let pending = svc
            .propose_session(&host(), &SessionProposal::new("Pending"))
            .await
            .unwrap();
        let mut ballot = svc.load_ballot("usr-1", BUDGET).await.unwrap();

        let result = svc.cast_optimistic(&mut ballot, &pending.id, 2).await;
        assert!(result.is_err());
        assert_eq!(ballot.votes_for(&pending.id), 0);
        assert_eq!(ballot.credits_spent(), 0);
    }

    #[tokio::test]
    async fn stale_ballot_is_reloaded() {
        let svc = test_service().await;
        let a = approved_session(&svc, "A").await;
        let b = approved_session(&svc, "B").await;
        let mut ballot = svc.load_ballot("usr-1", BUDGET).await.unwrap();

        // Another device spends 81 credits behind the ballot's back.
        svc.set_votes("usr-1", &b, 9, BUDGET).await.unwrap();

        let outcome = svc.cast_optimistic(&mut ballot, &a, 5).await.unwrap();
        assert!(outcome.is_rejected());
        assert_eq!(ballot.votes_for(&b), 9);
        assert_eq!(ballot.votes_for(&a), 0);
    }

    #[tokio::test]
    async fn stale_ballot_over_count_is_refreshed() {
        let svc = test_service().await;
        let a = approved_session(&svc, "A").await;
        let b = approved_session(&svc, "B").await;
        svc.set_votes("usr-1", &b, 9, BUDGET).await.unwrap();
        let mut ballot = svc.load_ballot("usr-1", BUDGET).await.unwrap();

        // Another device withdraws all 81 credits behind the ballot's back.
        svc.set_votes("usr-1", &b, 0, BUDGET).await.unwrap();

        let outcome = svc.cast_optimistic(&mut ballot, &a, 5).await.unwrap();
        assert!(!outcome.is_rejected());
        assert_eq!(ballot.votes_for(&a), 5);
        assert_eq!(ballot.votes_for(&b), 0);
        assert_eq!(
            ballot.credits_spent(),
            svc.participant_credits_spent("usr-1").await.unwrap()
        );
        assert_eq!(ballot.credits_spent(), 25);
    }

    #[tokio::test]
    async fn ballot_adopts_store_count_after_mismatch() {
        let svc = test_service().await;
        let a = approved_session(&svc, "A").await;
        let mut ballot = svc.load_ballot("usr-1", BUDGET).await.unwrap();
        svc.set_votes("usr-1", &a, 2, BUDGET).await.unwrap();

        let outcome = svc.cast_optimistic(&mut ballot, &a, 1).await.unwrap();
        let VoteOutcome::Applied { change, .. } = outcome else {
            panic!("expected applied outcome");
        };
        assert_eq!(change.previous_votes, 2);
        assert_eq!(change.new_votes, 3);
        assert_eq!(ballot.votes_for(&a), 3);
        assert_eq!(ballot.credits_spent(), 9);
    }

    #[tokio::test]
    async fn my_votes_summary() {
        let svc = test_service().await;
        let a = approved_session(&svc, "Alpha").await;
        let b = approved_session(&svc, "Beta").await;
        svc.set_votes("usr-1", &a, 2, BUDGET).await.unwrap();
        svc.set_votes("usr-1", &b, 5, BUDGET).await.unwrap();

        let summary = svc.my_votes("usr-1", BUDGET).await.unwrap();
        assert_eq!(summary.sessions_voted, 2);
        assert_eq!(summary.total_votes, 7);
        assert_eq!(summary.credits_used, 29);
        assert_eq!(summary.credits_remaining, 71);
        assert_eq!(summary.votes[0].title, "Beta");
        assert_eq!(summary.votes[1].host_name.as_deref(), Some("Host"));

        let ballot = svc.load_ballot("usr-1", BUDGET).await.unwrap();
        assert_eq!(ballot.credits_spent(), summary.credits_used);
    }

    #[tokio::test]
    async fn into_response_carries_transition() {
        let svc = test_service().await;
        let ses = approved_session(&svc, "Intro").await;
        let response = svc
            .cast_vote("usr-1", &ses, 1, BUDGET)
            .await
            .unwrap()
            .into_response(ses.as_str());
        let VoteCastResponse::Applied { transition, .. } = response else {
            panic!("expected applied");
        };
        assert_eq!(transition, VoteTransition::Created);
    }
}
