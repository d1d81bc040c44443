//! H2H Standings
//!
//! Publishes the current gameweek's head-to-head league standings. Meant to
//! run on a schedule: runs exit quietly until the gameweek results are final
//! and after the gameweek was published once.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use standings_service::{
    initialize_logging, load_config, run_exit_code, run_service, PublishOptions, RunOutcome,
};

#[derive(Debug, Parser)]
#[command(name = "h2h-standings", version, about = "Publish head-to-head league standings")]
struct Cli {
    /// Configuration file (json or toml)
    #[arg(short, long)]
    config: PathBuf,

    /// Update the gameweek points worksheet
    #[arg(short = 'g', long = "gameweek")]
    gameweek: bool,

    /// Update the rank worksheet and send the notification
    #[arg(short, long)]
    rank: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Log sink writes instead of performing them; never marks the gameweek
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    dotenv::dotenv().ok();

    let config = match load_config(&cli.config, cli.dry_run) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e:#}");
            return ExitCode::from(1);
        }
    };

    let _guard = match initialize_logging(&config.logging, cli.debug) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::from(1);
        }
    };

    info!("Starting h2h-standings v{} for league {}", env!("CARGO_PKG_VERSION"), config.h2h_league_id);

    let options = PublishOptions {
        update_points: cli.gameweek,
        update_rank: cli.rank,
        dry_run: cli.dry_run,
        format: config.notification.format,
    };

    let result = run_service(&config, &options).await;
    match &result {
        Ok(RunOutcome::AlreadyPublished { period }) => {
            info!("Nothing to do, gameweek {} already published", period)
        }
        Ok(RunOutcome::NotYetResolvable { period, reasons }) => {
            info!("Gameweek {} not resolvable yet: {:?}", period, reasons)
        }
        Ok(RunOutcome::Published { period, strategy, participants, marked }) => info!(
            "Gameweek {} done: {} participants via {} retrieval, marked={}",
            period, participants, strategy, marked
        ),
        Err(e) => error!("Run failed: {:#}", e),
    }

    ExitCode::from(run_exit_code(&result))
}
