use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let session = ctx
        .service
        .get_session(id)
        .await
        .with_context(|| format!("session '{id}' not found"))?;
    output(&session, flags.format)
}
