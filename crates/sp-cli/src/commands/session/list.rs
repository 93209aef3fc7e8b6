use sp_core::enums::{SessionFormat, SessionSort, SessionStatus};
use sp_db::repos::session::SessionFilter;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::parse_opt_enum;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    status: Option<&str>,
    kind: Option<&str>,
    search: Option<&str>,
    sort: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let filter = SessionFilter {
        status: parse_opt_enum::<SessionStatus>(status, "status")?,
        format: parse_opt_enum::<SessionFormat>(kind, "kind")?,
        search: search.map(String::from),
        sort: parse_opt_enum::<SessionSort>(sort, "sort")?.unwrap_or_default(),
        limit: flags.limit.unwrap_or(ctx.config.general.default_limit),
    };

    let sessions = ctx.service.list_sessions(&filter).await?;
    output(&sessions, flags.format)
}
