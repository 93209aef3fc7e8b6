use clap::Subcommand;

/// Session commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SessionCommands {
    /// Propose a new session.
    Propose {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// talk, workshop, discussion, panel, demo
        #[arg(long)]
        kind: Option<String>,
        /// Minutes: 30, 60, or 90
        #[arg(long)]
        duration: Option<u32>,
        /// Host name shown instead of your display name
        #[arg(long)]
        host_name: Option<String>,
        /// Topic tag (repeatable, up to 5)
        #[arg(long)]
        tag: Vec<String>,
    },
    /// List sessions.
    List {
        #[arg(long)]
        status: Option<String>,
        /// Only sessions of this kind
        #[arg(long)]
        kind: Option<String>,
        #[arg(long)]
        search: Option<String>,
        /// votes, recent, alpha
        #[arg(long)]
        sort: Option<String>,
    },
    /// Get a session by ID.
    Get { id: String },
    /// Approve a pending session so it accepts votes.
    Approve { id: String },
    /// Reject a pending session.
    Reject { id: String },
    /// Mark an approved session as scheduled.
    Schedule { id: String },
}
