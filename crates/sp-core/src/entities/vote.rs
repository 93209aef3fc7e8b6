use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ledger::credits_for_votes;

/// One participant's current allocation to one session.
///
/// Unique per `(participant_id, session_id)`. Persisted rows always have
/// `vote_count > 0` and `credits_spent == vote_count²`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Vote {
    pub participant_id: String,
    pub session_id: String,
    pub vote_count: u32,
    pub credits_spent: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vote {
    /// Whether the stored cost matches the quadratic price of the count.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.vote_count > 0 && self.credits_spent == credits_for_votes(self.vote_count)
    }
}
