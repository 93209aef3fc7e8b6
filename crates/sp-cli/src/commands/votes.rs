use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output::output;

/// Handle `spt votes`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let participant = ctx.participant()?;
    let summary = ctx
        .service
        .my_votes(&participant.participant_id, ctx.budget)
        .await?;

    if flags.format != OutputFormat::Table {
        return output(&summary, flags.format);
    }

    output(&summary.votes, flags.format)?;
    if !flags.quiet {
        println!(
            "\n{} votes on {} sessions, {} of {} credits used, {} remaining",
            summary.total_votes,
            summary.sessions_voted,
            summary.credits_used,
            ctx.budget.total(),
            summary.credits_remaining
        );
    }
    Ok(())
}
