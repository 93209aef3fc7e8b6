//! # sp-config
//!
//! Layered configuration loading for Schelling Point using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SCHELLING_*` prefix, `__` as separator)
//! 2. Project-level `.schelling/config.toml`
//! 3. User-level `~/.config/schelling/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `SCHELLING_VOTING__TOTAL_CREDITS` -> `voting.total_credits`,
//! `SCHELLING_GENERAL__PARTICIPANT_ID` -> `general.participant_id`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use sp_config::SpConfig;
//!
//! let config = SpConfig::load_with_dotenv().expect("config");
//! let budget = config.voting.budget().expect("budget");
//! println!("Each participant gets {budget}");
//! ```

mod database;
mod error;
mod general;
mod voting;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use voting::VotingConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use sp_core::identity::ParticipantIdentity;
use std::path::PathBuf;

/// Project-local config directory name.
pub const PROJECT_DIR: &str = ".schelling";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SpConfig {
    #[serde(default)]
    pub voting: VotingConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl SpConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`load_with_dotenv`](Self::load_with_dotenv)
    /// if you need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load `.env` from the current directory, then all config sources.
    ///
    /// A missing `.env` is fine. Variables already set in the process
    /// environment are not overridden.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Dotenv` if `.env` exists but cannot be read, or
    /// `ConfigError::Figment` if a source cannot be parsed.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        match dotenvy::from_path(".env") {
            Ok(()) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(ConfigError::Dotenv(e)),
        }
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(PROJECT_DIR).join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("SCHELLING_").split("__"))
    }

    /// The identity the CLI acts as.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` if no participant ID is set.
    pub fn participant(&self) -> Result<ParticipantIdentity, ConfigError> {
        if !self.general.has_participant() {
            return Err(ConfigError::NotConfigured {
                section: "general.participant_id".into(),
            });
        }
        let identity = ParticipantIdentity::new(self.general.participant_id.clone());
        Ok(if self.general.display_name.is_empty() {
            identity
        } else {
            identity.with_display_name(self.general.display_name.clone())
        })
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("schelling").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = SpConfig::default();
        assert_eq!(config.voting.total_credits, 100);
        assert!(!config.general.has_participant());
        assert_eq!(config.database.path, ".schelling/schelling.db");
    }

    #[test]
    fn participant_requires_id() {
        let config = SpConfig::default();
        assert!(matches!(
            config.participant(),
            Err(ConfigError::NotConfigured { .. })
        ));
    }

    #[test]
    fn participant_carries_display_name() {
        let mut config = SpConfig::default();
        config.general.participant_id = "usr-1".into();
        assert_eq!(config.participant().unwrap().host_name(), "usr-1");

        config.general.display_name = "Ada".into();
        assert_eq!(config.participant().unwrap().host_name(), "Ada");
    }
}
