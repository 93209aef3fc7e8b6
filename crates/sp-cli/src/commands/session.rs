use sp_core::enums::SessionStatus;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SessionCommands;
use crate::context::AppContext;

mod get;
mod list;
mod propose;
mod transition;

/// Handle `spt session`.
pub async fn handle(
    action: &SessionCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        SessionCommands::Propose {
            title,
            description,
            kind,
            duration,
            host_name,
            tag,
        } => {
            propose::run(
                propose::ProposeArgs {
                    title,
                    description: description.as_deref(),
                    kind: kind.as_deref(),
                    duration: *duration,
                    host_name: host_name.as_deref(),
                    tags: tag,
                },
                ctx,
                flags,
            )
            .await
        }
        SessionCommands::List {
            status,
            kind,
            search,
            sort,
        } => {
            list::run(
                status.as_deref(),
                kind.as_deref(),
                search.as_deref(),
                sort.as_deref(),
                ctx,
                flags,
            )
            .await
        }
        SessionCommands::Get { id } => get::run(id, ctx, flags).await,
        SessionCommands::Approve { id } => {
            transition::run(id, SessionStatus::Approved, ctx, flags).await
        }
        SessionCommands::Reject { id } => {
            transition::run(id, SessionStatus::Rejected, ctx, flags).await
        }
        SessionCommands::Schedule { id } => {
            transition::run(id, SessionStatus::Scheduled, ctx, flags).await
        }
    }
}
