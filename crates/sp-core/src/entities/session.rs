use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Vote;
use crate::enums::{SessionFormat, SessionStatus};
use crate::errors::CoreError;

/// Most topic tags a proposal may carry.
pub const MAX_TOPIC_TAGS: usize = 5;

/// Durations a proposal may request, in minutes.
pub const ALLOWED_DURATIONS: [u32; 3] = [30, 60, 90];

/// A proposed unconference session that participants vote on.
///
/// `total_votes`, `voter_count`, and `total_credits` are the denormalized
/// aggregate maintained by the store from the session's vote rows.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub format: SessionFormat,
    pub duration_minutes: u32,
    pub host_id: Option<String>,
    pub host_name: Option<String>,
    pub topic_tags: Vec<String>,
    pub status: SessionStatus,
    pub total_votes: u64,
    pub voter_count: u64,
    pub total_credits: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// The cached aggregate as a [`SessionTally`].
    #[must_use]
    pub const fn tally(&self) -> SessionTally {
        SessionTally {
            total_votes: self.total_votes,
            voter_count: self.voter_count,
            total_credits: self.total_credits,
        }
    }

    /// Lowercase, trim, and dedupe topic tags, then check proposal limits.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for an empty title, an unsupported
    /// duration, or more than [`MAX_TOPIC_TAGS`] distinct tags.
    pub fn normalize_proposal(
        title: &str,
        duration_minutes: u32,
        tags: &[String],
    ) -> Result<Vec<String>, CoreError> {
        if title.trim().is_empty() {
            return Err(CoreError::Validation("Title is required".into()));
        }
        if !ALLOWED_DURATIONS.contains(&duration_minutes) {
            return Err(CoreError::Validation(format!(
                "Duration must be one of {ALLOWED_DURATIONS:?} minutes, got {duration_minutes}"
            )));
        }

        let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
        for tag in tags {
            let tag = tag.trim().to_lowercase();
            if !tag.is_empty() && !normalized.contains(&tag) {
                normalized.push(tag);
            }
        }
        if normalized.len() > MAX_TOPIC_TAGS {
            return Err(CoreError::Validation(format!(
                "At most {MAX_TOPIC_TAGS} topic tags allowed, got {}",
                normalized.len()
            )));
        }
        Ok(normalized)
    }
}

/// Per-session vote totals across all participants.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SessionTally {
    /// Sum of `vote_count`.
    pub total_votes: u64,
    /// Participants with `vote_count > 0`.
    pub voter_count: u64,
    /// Sum of `credits_spent`.
    pub total_credits: u64,
}

impl SessionTally {
    /// Compute the tally from one session's vote rows.
    #[must_use]
    pub fn from_votes(votes: &[Vote]) -> Self {
        votes
            .iter()
            .filter(|vote| vote.vote_count > 0)
            .fold(Self::default(), |tally, vote| Self {
                total_votes: tally.total_votes + u64::from(vote.vote_count),
                voter_count: tally.voter_count + 1,
                total_credits: tally.total_credits + vote.credits_spent,
            })
    }
}
