//! Status, format, and sort enums for Schelling Point.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! `SessionStatus` provides `allowed_next_states()` to enforce valid transitions
//! at the application layer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// SessionStatus
// ---------------------------------------------------------------------------

/// Moderation status of a proposed session.
///
/// ```text
/// pending → approved → scheduled
///         → rejected
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Pending,
    Approved,
    Rejected,
    Scheduled,
}

impl SessionStatus {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Approved, Self::Rejected],
            Self::Approved => &[Self::Scheduled],
            Self::Rejected | Self::Scheduled => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Like [`can_transition_to`](Self::can_transition_to), as a `Result`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` if `next` is not reachable.
    pub fn ensure_transition(self, session_id: &str, next: Self) -> Result<(), CoreError> {
        if self.can_transition_to(next) {
            return Ok(());
        }
        Err(CoreError::InvalidTransition {
            entity_type: "session".to_string(),
            id: session_id.to_string(),
            from: self.to_string(),
            to: next.to_string(),
        })
    }

    /// Only approved and scheduled sessions accept votes.
    #[must_use]
    pub const fn is_votable(self) -> bool {
        matches!(self, Self::Approved | Self::Scheduled)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Scheduled => "scheduled",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SessionFormat
// ---------------------------------------------------------------------------

/// Kind of session being proposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionFormat {
    #[default]
    Talk,
    Workshop,
    Discussion,
    Panel,
    Demo,
}

impl SessionFormat {
    pub const ALL: [Self; 5] = [
        Self::Talk,
        Self::Workshop,
        Self::Discussion,
        Self::Panel,
        Self::Demo,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Talk => "talk",
            Self::Workshop => "workshop",
            Self::Discussion => "discussion",
            Self::Panel => "panel",
            Self::Demo => "demo",
        }
    }
}

impl fmt::Display for SessionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SessionSort
// ---------------------------------------------------------------------------

/// Ordering for session listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionSort {
    /// Most total votes first.
    #[default]
    Votes,
    /// Newest proposals first.
    Recent,
    /// Title, A to Z.
    Alpha,
}

impl SessionSort {
    /// SQL `ORDER BY` clause for this sort.
    #[must_use]
    pub const fn order_by(self) -> &'static str {
        match self {
            Self::Votes => "total_votes DESC, created_at DESC",
            Self::Recent => "created_at DESC",
            Self::Alpha => "title COLLATE NOCASE ASC",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Votes => "votes",
            Self::Recent => "recent",
            Self::Alpha => "alpha",
        }
    }
}

impl fmt::Display for SessionSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
