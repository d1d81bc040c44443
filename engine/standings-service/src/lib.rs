//! H2H Standings Service Library
//!
//! Wires the fixture fetcher, standings engine and completion tracker to the
//! spreadsheet and notification sinks, and provides configuration loading and
//! logging setup for the `h2h-standings` binary.

use anyhow::{Context, Result};
use completion_tracker::{CompletionStore, FileCompletionTracker};
use fixture_fetcher::{FetcherError, FplClient};
use standings_engine::StandingsError;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub mod config;
pub mod logging;
pub mod orchestrator;
pub mod sinks;

pub use config::{load_config, ServiceConfig};
pub use logging::initialize_logging;
pub use orchestrator::{PublishOptions, RunOutcome, StandingsPublisher};
pub use sinks::{Notifier, SinkError, SpreadsheetSink};

use sinks::{GoogleSheetsClient, LoggingNotifier, LoggingSheet, PubSubNotifier};

/// Build every component from configuration and run one publication
pub async fn run_service(config: &ServiceConfig, options: &PublishOptions) -> Result<RunOutcome> {
    let api = Arc::new(FplClient::new(config.fetcher_config()).context("Failed to create FPL client")?);

    let tracker: Arc<dyn CompletionStore> = Arc::new(
        FileCompletionTracker::open(&config.gameweekdb_path)
            .await
            .context("Failed to open completion marker file")?,
    );

    let (sheet, notifier): (Arc<dyn SpreadsheetSink>, Arc<dyn Notifier>) = if options.dry_run {
        info!("Dry run: sink writes are logged only");
        (Arc::new(LoggingSheet), Arc::new(LoggingNotifier))
    } else {
        let timeout = Duration::from_secs(config.fpl.timeout_secs);
        (
            Arc::new(
                GoogleSheetsClient::from_env(config.sheets.clone(), timeout)
                    .context("Failed to create Google Sheets client")?,
            ),
            Arc::new(
                PubSubNotifier::from_env(config.pubsub.clone(), timeout)
                    .context("Failed to create Pub/Sub publisher")?,
            ),
        )
    };

    let span = tracing::info_span!("publish", league = config.h2h_league_id);
    StandingsPublisher::new(api, tracker, sheet, notifier, span).run(options).await
}

/// Process exit code for a failed run: 2 when the league data itself is
/// unusable, 1 for everything else
pub fn exit_code(error: &anyhow::Error) -> u8 {
    for cause in error.chain() {
        if let Some(fetch) = cause.downcast_ref::<FetcherError>() {
            if fetch.is_data_error() {
                return 2;
            }
        }
        if cause.downcast_ref::<StandingsError>().is_some() {
            return 2;
        }
    }
    1
}

/// Process exit code for a run result
pub fn run_exit_code(result: &Result<RunOutcome>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(e) => exit_code(e),
    }
}
