//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default result limit.
const fn default_limit() -> u32 {
    20
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Participant the CLI acts as when `--participant` is not given.
    #[serde(default)]
    pub participant_id: String,

    /// Display name recorded as host on proposals.
    #[serde(default)]
    pub display_name: String,

    /// Default result limit for list commands.
    #[serde(default = "default_limit")]
    pub default_limit: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            participant_id: String::new(),
            display_name: String::new(),
            default_limit: default_limit(),
        }
    }
}

impl GeneralConfig {
    pub fn has_participant(&self) -> bool {
        !self.participant_id.is_empty()
    }
}
