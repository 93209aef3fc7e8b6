use anyhow::Context;
use sp_config::SpConfig;

use crate::cli::GlobalFlags;

/// Load `.env` and layered config, then apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<SpConfig> {
    let config = SpConfig::load_with_dotenv().context("failed to load schelling configuration")?;
    Ok(apply_overrides(config, flags))
}

/// `--participant` and `--db` win over every config layer.
fn apply_overrides(mut config: SpConfig, flags: &GlobalFlags) -> SpConfig {
    if let Some(participant) = &flags.participant {
        config.general.participant_id.clone_from(participant);
    }
    if let Some(db) = &flags.db {
        config.database.path.clone_from(db);
    }
    config
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::cli::OutputFormat;

    fn flags(participant: Option<&str>, db: Option<&str>) -> GlobalFlags {
        GlobalFlags {
            format: OutputFormat::Json,
            limit: None,
            quiet: false,
            participant: participant.map(String::from),
            db: db.map(String::from),
        }
    }

    #[test]
    fn flags_override_config() {
        let config = apply_overrides(SpConfig::default(), &flags(Some("usr-9"), Some(":memory:")));
        assert_eq!(config.general.participant_id, "usr-9");
        assert!(config.database.is_in_memory());
    }

    #[test]
    fn absent_flags_keep_config() {
        let mut base = SpConfig::default();
        base.general.participant_id = "usr-1".into();
        let config = apply_overrides(base, &flags(None, None));
        assert_eq!(config.general.participant_id, "usr-1");
        assert_eq!(config.database.path, ".schelling/schelling.db");
    }
}
