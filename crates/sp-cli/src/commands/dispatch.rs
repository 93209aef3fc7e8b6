use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands::{self, Outcome};
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<Outcome> {
    match command {
        Commands::Session { action } => {
            commands::session::handle(&action, ctx, flags).await?;
            Ok(Outcome::Done)
        }
        Commands::Vote { action } => commands::vote::handle(&action, ctx, flags).await,
        Commands::Votes => {
            commands::votes::handle(ctx, flags).await?;
            Ok(Outcome::Done)
        }
        Commands::Credits => {
            commands::credits::handle(ctx, flags).await?;
            Ok(Outcome::Done)
        }
        Commands::Rebuild => {
            commands::rebuild::handle(ctx, flags).await?;
            Ok(Outcome::Done)
        }
        Commands::Cost(_) => unreachable!("cost is pre-dispatched in main"),
    }
}
