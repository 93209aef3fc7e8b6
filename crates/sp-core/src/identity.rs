use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Authenticated participant identity for cross-crate passing.
///
/// Issued by the external auth provider (magic-link login); contains only
/// data fields, no token handling.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ParticipantIdentity {
    /// Stable participant ID (the auth provider's user ID).
    pub participant_id: String,
    /// Name shown as host on proposals. `None` falls back to the ID.
    pub display_name: Option<String>,
}

impl ParticipantIdentity {
    #[must_use]
    pub fn new(participant_id: impl Into<String>) -> Self {
        Self {
            participant_id: participant_id.into(),
            display_name: None,
        }
    }

    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Host name recorded on sessions this participant proposes.
    #[must_use]
    pub fn host_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.participant_id)
    }
}
