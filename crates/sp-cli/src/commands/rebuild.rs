use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `spt rebuild`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = ctx.service.rebuild_aggregates().await?;
    if response.sessions_corrected > 0 && !flags.quiet {
        eprintln!(
            "spt: corrected vote totals on {} of {} sessions",
            response.sessions_corrected, response.sessions_checked
        );
    }
    output(&response, flags.format)
}
