//! Quadratic voting configuration.

use serde::{Deserialize, Serialize};
use sp_core::ledger::{Budget, REFERENCE_TOTAL_CREDITS};

use crate::error::ConfigError;

const fn default_total_credits() -> u64 {
    REFERENCE_TOTAL_CREDITS
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VotingConfig {
    /// Credits each participant may spend across all sessions.
    #[serde(default = "default_total_credits")]
    pub total_credits: u64,
}

impl Default for VotingConfig {
    fn default() -> Self {
        Self {
            total_credits: default_total_credits(),
        }
    }
}

impl VotingConfig {
    /// The validated per-participant budget.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `total_credits` is zero.
    pub fn budget(&self) -> Result<Budget, ConfigError> {
        Budget::new(self.total_credits).map_err(|e| ConfigError::InvalidValue {
            field: "voting.total_credits".into(),
            reason: e.to_string(),
        })
    }
}
