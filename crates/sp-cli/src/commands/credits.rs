use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `spt credits`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let participant = ctx.participant()?;
    let ballot = ctx
        .service
        .load_ballot(&participant.participant_id, ctx.budget)
        .await?;
    output(&ballot.status(), flags.format)
}
