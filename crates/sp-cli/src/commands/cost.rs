use serde::Serialize;
use sp_config::SpConfig;
use sp_core::ledger::{Budget, CostQuote, votes_for_credits};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::CostArgs;
use crate::output::output;

/// Price preview; needs no database.
#[derive(Debug, Serialize)]
struct CostPreview {
    #[serde(flatten)]
    quote: CostQuote,
    budget: u64,
    /// Most votes a full budget buys on one session.
    max_votes_on_one_session: u32,
}

impl CostPreview {
    fn new(votes: u32, budget: Budget) -> Self {
        Self {
            quote: CostQuote::new(votes, budget),
            budget: budget.total(),
            max_votes_on_one_session: votes_for_credits(budget.total()),
        }
    }
}

/// Handle `spt cost <votes>`.
pub fn handle(args: &CostArgs, config: &SpConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let budget = config.voting.budget()?;
    output(&CostPreview::new(args.votes, budget), flags.format)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn preview_for_reference_budget() {
        let preview = CostPreview::new(7, Budget::REFERENCE);
        let json = serde_json::to_value(&preview).expect("serialize");
        assert_eq!(json["votes"], 7);
        assert_eq!(json["credits"], 49);
        assert_eq!(json["next_vote_cost"], 15);
        assert_eq!(json["fits_budget"], true);
        assert_eq!(json["max_votes_on_one_session"], 10);
    }

    #[test]
    fn preview_beyond_budget() {
        let preview = CostPreview::new(11, Budget::REFERENCE);
        assert!(!preview.quote.fits_budget);
        assert_eq!(preview.quote.credits, 121);
    }
}
