use sp_core::responses::VoteCastResponse;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::VoteCommands;
use crate::commands::Outcome;
use crate::context::AppContext;
use crate::output::output;

/// Handle `spt vote`.
pub async fn handle(
    action: &VoteCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<Outcome> {
    let participant = ctx.participant()?;
    let participant_id = participant.participant_id.as_str();

    let (session_id, outcome) = match action {
        VoteCommands::Add { session } => (
            session,
            ctx.service
                .cast_vote(participant_id, session, 1, ctx.budget)
                .await?,
        ),
        VoteCommands::Remove { session } => (
            session,
            ctx.service
                .cast_vote(participant_id, session, -1, ctx.budget)
                .await?,
        ),
        VoteCommands::Set { session, count } => (
            session,
            ctx.service
                .set_votes(participant_id, session, *count, ctx.budget)
                .await?,
        ),
    };

    let response = outcome.into_response(session_id.as_str());
    output(&response, flags.format)?;
    Ok(report(&response, flags))
}

fn report(response: &VoteCastResponse, flags: &GlobalFlags) -> Outcome {
    match response {
        VoteCastResponse::Applied { .. } => Outcome::Done,
        VoteCastResponse::Rejected { rejection, .. } => {
            if !flags.quiet {
                eprintln!(
                    "spt: {rejection} ({} credits short)",
                    rejection.shortfall()
                );
            }
            Outcome::BudgetRejected
        }
    }
}
