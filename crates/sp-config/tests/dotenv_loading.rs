//! `.env` loading through `SpConfig::load_with_dotenv`.
//!
//! Kept in its own test binary: dotenvy writes straight into the process
//! environment, which `figment::Jail` does not restore.

use figment::Jail;
use pretty_assertions::assert_eq;
use sp_config::{ConfigError, SpConfig};

#[test]
fn dotenv_values_flow_through_figment() {
    Jail::expect_with(|jail| {
        jail.create_file(
            ".env",
            "SCHELLING_VOTING__TOTAL_CREDITS=64\nSCHELLING_GENERAL__PARTICIPANT_ID=usr-dotenv\n",
        )?;

        let config = SpConfig::load_with_dotenv().expect("config should load");
        assert_eq!(config.voting.total_credits, 64);
        assert_eq!(config.general.participant_id, "usr-dotenv");
        Ok(())
    });
}

#[test]
fn missing_dotenv_is_not_an_error() {
    Jail::expect_with(|_jail| {
        assert!(SpConfig::load_with_dotenv().is_ok());
        Ok(())
    });
}

#[test]
fn malformed_dotenv_is_reported() {
    Jail::expect_with(|jail| {
        jail.create_file(".env", "this is not a key value pair\n")?;

        let err = SpConfig::load_with_dotenv().expect_err("malformed .env should fail");
        assert!(matches!(err, ConfigError::Dotenv(_)), "got {err:?}");
        Ok(())
    });
}
