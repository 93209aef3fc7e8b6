use sp_core::enums::SessionFormat;
use sp_db::repos::session::SessionProposal;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::parse_opt_enum;
use crate::context::AppContext;
use crate::output::output;

pub struct ProposeArgs<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub kind: Option<&'a str>,
    pub duration: Option<u32>,
    pub host_name: Option<&'a str>,
    pub tags: &'a [String],
}

pub async fn run(args: ProposeArgs<'_>, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let proposer = ctx.participant()?;

    let mut proposal = SessionProposal::new(args.title);
    proposal.description = args.description.map(String::from);
    proposal.format = parse_opt_enum::<SessionFormat>(args.kind, "kind")?.unwrap_or_default();
    if let Some(duration) = args.duration {
        proposal.duration_minutes = duration;
    }
    proposal.host_name = args.host_name.map(String::from);
    proposal.topic_tags = args.tags.to_vec();

    let session = ctx.service.propose_session(&proposer, &proposal).await?;
    tracing::info!(session_id = %session.id, "session proposed");
    output(&session, flags.format)
}
