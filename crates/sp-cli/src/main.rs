use anyhow::Context;
use clap::Parser;

mod bootstrap;
mod cli;
mod commands;
mod context;
mod output;
mod ui;

use commands::Outcome;

/// Exit status when the admission gate refuses a vote change.
const EXIT_BUDGET_REJECTED: i32 = 2;

#[tokio::main]
async fn main() {
    match run().await {
        Ok(Outcome::Done) => {}
        Ok(Outcome::BudgetRejected) => std::process::exit(EXIT_BUDGET_REJECTED),
        Err(error) => {
            eprintln!("spt error: {error:#}");
            std::process::exit(1);
        }
    }
}

async fn run() -> anyhow::Result<Outcome> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    ui::init(&flags);

    let config = bootstrap::load_config(&flags)?;

    if let cli::Commands::Cost(args) = &cli.command {
        commands::cost::handle(args, &config, &flags)?;
        return Ok(Outcome::Done);
    }

    let ctx = context::AppContext::init(config)
        .await
        .context("failed to initialize schelling application context")?;

    commands::dispatch::dispatch(cli.command, &ctx, &flags).await
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("SCHELLING_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
