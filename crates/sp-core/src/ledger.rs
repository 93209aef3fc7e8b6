//! Quadratic-voting credit ledger.
//!
//! Every participant holds a fixed credit budget. Holding `n` votes on one
//! session costs `n²` credits, so the next vote always costs `2n + 1`. All
//! functions here are pure: callers pass in the current state, and the
//! returned [`VoteChange`] tells them what to persist.
//!
//! ```text
//! votes:        0   1   2   3   4   5
//! total cost:   0   1   4   9  16  25
//! next vote:    1   3   5   7   9  11
//! ```
//!
//! Vote counts are `u32` and credit amounts `u64`, so negative counts cannot
//! reach the ledger. Signed values from outside (CLI arguments, database
//! rows) go through [`checked_votes`] and [`checked_credits`] first.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::LedgerError;

/// Credits each participant receives in the reference deployment.
pub const REFERENCE_TOTAL_CREDITS: u64 = 100;

// ---------------------------------------------------------------------------
// Budget
// ---------------------------------------------------------------------------

/// A participant's total credit budget. Always positive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(try_from = "u64", into = "u64")]
pub struct Budget(#[schemars(range(min = 1))] u64);

impl Budget {
    /// The 100-credit budget of the reference deployment.
    pub const REFERENCE: Self = Self(REFERENCE_TOTAL_CREDITS);

    /// # Errors
    ///
    /// Returns `LedgerError::InvalidInput` if `total_credits` is zero.
    pub const fn new(total_credits: u64) -> Result<Self, LedgerError> {
        if total_credits == 0 {
            return Err(LedgerError::InvalidInput {
                field: "total_credits",
                value: 0,
                reason: "budget must be positive",
            });
        }
        Ok(Self(total_credits))
    }

    #[must_use]
    pub const fn total(self) -> u64 {
        self.0
    }
}

impl Default for Budget {
    fn default() -> Self {
        Self::REFERENCE
    }
}

impl TryFrom<u64> for Budget {
    type Error = LedgerError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Budget> for u64 {
    fn from(budget: Budget) -> Self {
        budget.0
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} credits", self.0)
    }
}

// ---------------------------------------------------------------------------
// Boundary validation
// ---------------------------------------------------------------------------

/// Validate a signed vote count coming from outside the ledger.
///
/// # Errors
///
/// Returns `LedgerError::InvalidInput` for negative values or values above `u32::MAX`.
pub fn checked_votes(field: &'static str, value: i64) -> Result<u32, LedgerError> {
    if value < 0 {
        return Err(LedgerError::InvalidInput {
            field,
            value: i128::from(value),
            reason: "must not be negative",
        });
    }
    u32::try_from(value).map_err(|_| LedgerError::InvalidInput {
        field,
        value: i128::from(value),
        reason: "exceeds the largest representable vote count",
    })
}

/// Validate a signed credit amount coming from outside the ledger.
///
/// # Errors
///
/// Returns `LedgerError::InvalidInput` for negative values.
pub fn checked_credits(field: &'static str, value: i64) -> Result<u64, LedgerError> {
    u64::try_from(value).map_err(|_| LedgerError::InvalidInput {
        field,
        value: i128::from(value),
        reason: "must not be negative",
    })
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

/// Total cost of holding exactly `votes` votes on one session: `votes²`.
#[must_use]
pub fn credits_for_votes(votes: u32) -> u64 {
    let votes = u64::from(votes);
    votes * votes
}

/// Cost of the next single vote when `current_votes` are already held.
///
/// Equals `(v + 1)² − v²` = `2v + 1`: the odd numbers 1, 3, 5, 7, …
#[must_use]
pub fn marginal_cost(current_votes: u32) -> u64 {
    2 * u64::from(current_votes) + 1
}

/// The largest whole number of votes whose cost fits in `credits`.
///
/// Exact integer square root, so `credits_for_votes(votes_for_credits(c)) <= c`
/// holds for every `c` without floating-point rounding.
#[must_use]
pub fn votes_for_credits(credits: u64) -> u32 {
    // isqrt(u64::MAX) < 2^32, so the conversion never saturates.
    u32::try_from(credits.isqrt()).unwrap_or(u32::MAX)
}

// ---------------------------------------------------------------------------
// Admission gate
// ---------------------------------------------------------------------------

/// Whether one more vote on a session fits in the budget.
///
/// `spent_across_all_sessions` is the participant's total spend, including
/// the credits already held on this session.
#[must_use]
pub fn can_increment(spent_across_all_sessions: u64, current_votes: u32, budget: Budget) -> bool {
    current_votes < u32::MAX
        && spent_across_all_sessions.saturating_add(marginal_cost(current_votes)) <= budget.total()
}

/// Removing a vote is allowed down to zero, never below.
#[must_use]
pub const fn can_decrement(current_votes: u32) -> bool {
    current_votes > 0
}

/// Compute the effect of changing a session's votes by `delta`.
///
/// The new count is `current_votes + delta` clamped to `0..=u32::MAX`. The
/// budget is re-checked against the full recomputed total
/// (`spent − current² + new²`), not the marginal difference. Changes that do
/// not add votes are always admitted since they can only lower spend.
///
/// # Errors
///
/// Returns `BudgetExceeded` when the new total would exceed `budget`. This is
/// an expected outcome; nothing has been mutated.
pub fn apply_delta(
    current_votes: u32,
    delta: i64,
    spent_across_all_sessions: u64,
    budget: Budget,
) -> Result<VoteChange, BudgetExceeded> {
    let proposed = i64::from(current_votes)
        .saturating_add(delta)
        .clamp(0, i64::from(u32::MAX));
    let new_votes = u32::try_from(proposed).unwrap_or(u32::MAX);
    let change = VoteChange::new(current_votes, new_votes);

    if new_votes <= current_votes {
        return Ok(change);
    }

    let required = spent_across_all_sessions
        .saturating_sub(change.previous_credits)
        .saturating_add(change.new_credits);
    if required > budget.total() {
        return Err(BudgetExceeded {
            proposed_votes: new_votes,
            required,
            budget: budget.total(),
        });
    }

    Ok(change)
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// An admitted change to one participant's votes on one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VoteChange {
    pub previous_votes: u32,
    pub previous_credits: u64,
    pub new_votes: u32,
    pub new_credits: u64,
}

impl VoteChange {
    #[must_use]
    pub fn new(previous_votes: u32, new_votes: u32) -> Self {
        Self {
            previous_votes,
            previous_credits: credits_for_votes(previous_votes),
            new_votes,
            new_credits: credits_for_votes(new_votes),
        }
    }

    /// Lifecycle step of the vote row this change produces.
    #[must_use]
    pub const fn transition(&self) -> VoteTransition {
        match (self.previous_votes, self.new_votes) {
            (a, b) if a == b => VoteTransition::Unchanged,
            (0, _) => VoteTransition::Created,
            (_, 0) => VoteTransition::Deleted,
            _ => VoteTransition::Updated,
        }
    }

    /// The write the caller must perform against the vote store.
    #[must_use]
    pub const fn write(&self) -> VoteWrite {
        match self.transition() {
            VoteTransition::Unchanged => VoteWrite::Noop,
            VoteTransition::Deleted => VoteWrite::Delete,
            VoteTransition::Created | VoteTransition::Updated => VoteWrite::Upsert {
                vote_count: self.new_votes,
                credits_spent: self.new_credits,
            },
        }
    }

    /// Signed change in credits spent.
    #[must_use]
    pub fn credit_delta(&self) -> i128 {
        i128::from(self.new_credits) - i128::from(self.previous_credits)
    }

    /// The change that undoes this one.
    #[must_use]
    pub const fn inverse(&self) -> Self {
        Self {
            previous_votes: self.new_votes,
            previous_credits: self.new_credits,
            new_votes: self.previous_votes,
            new_credits: self.previous_credits,
        }
    }
}

/// Lifecycle of a vote row: `absent → n>0 → n>0 → absent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum VoteTransition {
    Created,
    Updated,
    Deleted,
    Unchanged,
}

impl VoteTransition {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::Unchanged => "unchanged",
        }
    }
}

impl fmt::Display for VoteTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persistence required by a [`VoteChange`]. Zero-vote rows are never written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteWrite {
    Upsert { vote_count: u32, credits_spent: u64 },
    Delete,
    Noop,
}

/// A vote change rejected by the admission gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize, JsonSchema)]
#[error(
    "Budget exceeded: {proposed_votes} votes would bring spend to {required} of {budget} credits"
)]
pub struct BudgetExceeded {
    pub proposed_votes: u32,
    pub required: u64,
    pub budget: u64,
}

impl BudgetExceeded {
    /// How many credits the participant is short.
    #[must_use]
    pub const fn shortfall(&self) -> u64 {
        self.required.saturating_sub(self.budget)
    }
}

/// Summary of a participant's spend against their budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BudgetStatus {
    pub total: u64,
    pub spent: u64,
    pub remaining: u64,
    /// Whole percent of the budget spent.
    pub percent_used: u64,
    /// Most votes the remaining credits buy on a session with no votes yet.
    pub max_votes_on_new_session: u32,
}

impl BudgetStatus {
    #[must_use]
    pub fn new(budget: Budget, spent: u64) -> Self {
        let remaining = budget.total().saturating_sub(spent);
        Self {
            total: budget.total(),
            spent,
            remaining,
            percent_used: spent.saturating_mul(100) / budget.total(),
            max_votes_on_new_session: votes_for_credits(remaining),
        }
    }
}

/// Price sheet for holding a given number of votes on one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CostQuote {
    pub votes: u32,
    pub credits: u64,
    pub next_vote_cost: u64,
    pub fits_budget: bool,
}

impl CostQuote {
    #[must_use]
    pub fn new(votes: u32, budget: Budget) -> Self {
        let credits = credits_for_votes(votes);
        Self {
            votes,
            credits,
            next_vote_cost: marginal_cost(votes),
            fits_budget: credits <= budget.total(),
        }
    }
}
