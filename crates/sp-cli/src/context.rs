use anyhow::Context;
use sp_config::SpConfig;
use sp_core::identity::ParticipantIdentity;
use sp_core::ledger::Budget;
use sp_db::service::VoteService;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: VoteService,
    pub config: SpConfig,
    pub budget: Budget,
}

impl AppContext {
    /// Validate the budget and open the vote store.
    pub async fn init(config: SpConfig) -> anyhow::Result<Self> {
        let budget = config.voting.budget()?;

        if let Some(parent) = config.database.parent_dir() {
            std::fs::create_dir_all(&parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let service = VoteService::new_local(&config.database.path)
            .await
            .with_context(|| format!("failed to open vote store at {}", config.database.path))?;

        Ok(Self {
            service,
            config,
            budget,
        })
    }

    /// The participant commands act as.
    pub fn participant(&self) -> anyhow::Result<ParticipantIdentity> {
        self.config
            .participant()
            .context("no participant configured; pass --participant or set general.participant_id")
    }
}
