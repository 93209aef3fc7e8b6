//! CLI response types returned as JSON by `spt` commands.
//!
//! These structs define the shape of JSON output for commands like
//! `spt vote add`, `spt votes`, and `spt rebuild`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::SessionFormat;
use crate::ledger::{BudgetExceeded, BudgetStatus, VoteChange, VoteTransition};

/// Response from `spt vote add|remove|set`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VoteCastResponse {
    Applied {
        session_id: String,
        transition: VoteTransition,
        change: VoteChange,
        budget: BudgetStatus,
    },
    Rejected {
        session_id: String,
        rejection: BudgetExceeded,
        budget: BudgetStatus,
    },
}

impl VoteCastResponse {
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// One row of `spt votes`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct VoteSummary {
    pub session_id: String,
    pub title: String,
    pub format: SessionFormat,
    pub host_name: Option<String>,
    pub vote_count: u32,
    pub credits_spent: u64,
}

/// Response from `spt votes`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MyVotesResponse {
    pub participant_id: String,
    pub sessions_voted: u32,
    pub total_votes: u64,
    pub credits_used: u64,
    pub credits_remaining: u64,
    /// Sorted by `vote_count`, highest first.
    pub votes: Vec<VoteSummary>,
}

/// Response from `spt rebuild`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RebuildResponse {
    pub rebuilt: bool,
    pub sessions_checked: u32,
    pub sessions_corrected: u32,
    pub duration_ms: u64,
}
