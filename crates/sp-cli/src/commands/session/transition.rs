use sp_core::enums::SessionStatus;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    id: &str,
    status: SessionStatus,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let session = ctx.service.transition_session(id, status).await?;
    output(&session, flags.format)
}
