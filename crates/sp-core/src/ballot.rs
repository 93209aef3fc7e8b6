//! A participant's in-memory view of all their vote allocations.
//!
//! Every call site that changes votes goes through [`Ballot::preview`] or
//! [`Ballot::apply`], so the admission gate always sees the participant's
//! full spend across sessions. `apply` updates the ballot optimistically and
//! hands back a [`PendingVote`]; if persisting the change fails, pass it to
//! [`Ballot::revert`] to restore the exact prior allocation.

use std::collections::BTreeMap;

use crate::entities::Vote;
use crate::ledger::{
    self, Budget, BudgetExceeded, BudgetStatus, VoteChange, credits_for_votes,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ballot {
    participant_id: String,
    budget: Budget,
    /// Session ID to vote count. Zero counts are never stored.
    allocations: BTreeMap<String, u32>,
}

impl Ballot {
    #[must_use]
    pub fn new(participant_id: impl Into<String>, budget: Budget) -> Self {
        Self {
            participant_id: participant_id.into(),
            budget,
            allocations: BTreeMap::new(),
        }
    }

    /// Build a ballot from the participant's persisted vote rows.
    #[must_use]
    pub fn from_votes<'a>(
        participant_id: impl Into<String>,
        budget: Budget,
        votes: impl IntoIterator<Item = &'a Vote>,
    ) -> Self {
        let mut ballot = Self::new(participant_id, budget);
        for vote in votes {
            ballot.set(&vote.session_id, vote.vote_count);
        }
        ballot
    }

    #[must_use]
    pub fn participant_id(&self) -> &str {
        &self.participant_id
    }

    #[must_use]
    pub const fn budget(&self) -> Budget {
        self.budget
    }

    /// Votes currently held on `session_id` (0 if none).
    #[must_use]
    pub fn votes_for(&self, session_id: &str) -> u32 {
        self.allocations.get(session_id).copied().unwrap_or(0)
    }

    /// Credits spent across every session on this ballot.
    #[must_use]
    pub fn credits_spent(&self) -> u64 {
        self.allocations
            .values()
            .fold(0u64, |sum, votes| sum.saturating_add(credits_for_votes(*votes)))
    }

    #[must_use]
    pub fn credits_remaining(&self) -> u64 {
        self.budget.total().saturating_sub(self.credits_spent())
    }

    #[must_use]
    pub fn total_votes(&self) -> u64 {
        self.allocations.values().map(|votes| u64::from(*votes)).sum()
    }

    #[must_use]
    pub fn sessions_voted(&self) -> usize {
        self.allocations.len()
    }

    /// Allocations in session-ID order.
    pub fn allocations(&self) -> impl Iterator<Item = (&str, u32)> {
        self.allocations
            .iter()
            .map(|(session_id, votes)| (session_id.as_str(), *votes))
    }

    #[must_use]
    pub fn status(&self) -> BudgetStatus {
        BudgetStatus::new(self.budget, self.credits_spent())
    }

    /// Whether one more vote on `session_id` fits the budget.
    #[must_use]
    pub fn can_increment(&self, session_id: &str) -> bool {
        ledger::can_increment(self.credits_spent(), self.votes_for(session_id), self.budget)
    }

    #[must_use]
    pub fn can_decrement(&self, session_id: &str) -> bool {
        ledger::can_decrement(self.votes_for(session_id))
    }

    /// Validate a change without touching the ballot.
    ///
    /// # Errors
    ///
    /// Returns `BudgetExceeded` if the change does not fit the budget.
    pub fn preview(&self, session_id: &str, delta: i64) -> Result<VoteChange, BudgetExceeded> {
        ledger::apply_delta(
            self.votes_for(session_id),
            delta,
            self.credits_spent(),
            self.budget,
        )
    }

    /// Validate and apply a change locally, before it is persisted.
    ///
    /// # Errors
    ///
    /// Returns `BudgetExceeded` if the change does not fit the budget; the
    /// ballot is left untouched.
    pub fn apply(&mut self, session_id: &str, delta: i64) -> Result<PendingVote, BudgetExceeded> {
        let change = self.preview(session_id, delta)?;
        self.set(session_id, change.new_votes);
        Ok(PendingVote {
            session_id: session_id.to_string(),
            change,
        })
    }

    /// Undo an optimistic change whose persistence failed.
    pub fn revert(&mut self, pending: PendingVote) {
        self.set(&pending.session_id, pending.change.previous_votes);
    }

    /// Record the store's authoritative count for one session.
    pub fn sync(&mut self, session_id: &str, votes: u32) {
        self.set(session_id, votes);
    }

    fn set(&mut self, session_id: &str, votes: u32) {
        if votes == 0 {
            self.allocations.remove(session_id);
        } else {
            self.allocations.insert(session_id.to_string(), votes);
        }
    }
}

/// An optimistically applied change awaiting persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a pending vote must be persisted or reverted"]
pub struct PendingVote {
    session_id: String,
    change: VoteChange,
}

impl PendingVote {
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    #[must_use]
    pub const fn change(&self) -> &VoteChange {
        &self.change
    }
}
