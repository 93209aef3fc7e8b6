use clap::{Args, Subcommand};

use crate::cli::subcommands::{SessionCommands, VoteCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Session proposals and moderation.
    Session {
        #[command(subcommand)]
        action: SessionCommands,
    },
    /// Change your votes on a session.
    Vote {
        #[command(subcommand)]
        action: VoteCommands,
    },
    /// Show your votes across all sessions.
    Votes,
    /// Show your credit budget.
    Credits,
    /// Preview the credit cost of a vote count.
    Cost(CostArgs),
    /// Recompute session vote totals from the vote rows.
    Rebuild,
}

#[derive(Clone, Debug, Args)]
pub struct CostArgs {
    /// Votes to price on a single session.
    pub votes: u32,
}
