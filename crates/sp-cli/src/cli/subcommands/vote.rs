use clap::Subcommand;

/// Vote commands. Every change is checked against your credit budget.
#[derive(Clone, Debug, Subcommand)]
pub enum VoteCommands {
    /// Add one vote to a session.
    Add { session: String },
    /// Remove one vote from a session.
    Remove { session: String },
    /// Set your votes on a session to an exact count (0 withdraws).
    Set { session: String, count: u32 },
}
