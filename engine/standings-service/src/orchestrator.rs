//! Weekly standings publication
//!
//! One run looks at the current gameweek, skips it if it was already
//! published, otherwise retrieves every elapsed gameweek's fixtures, rebuilds
//! the league table and pushes it to the spreadsheet and notification sinks.
//! The gameweek is marked as published only after a full, real update.

use crate::sinks::{Notifier, SpreadsheetSink};
use anyhow::{Context, Result};
use completion_tracker::CompletionStore;
use fixture_fetcher::{LeagueApi, LeagueSession, RetrievalOutcome, Strategy};
use standings_engine::{aggregate_retrieval, build_message, rank, MessageFormat};
use std::sync::Arc;
use tracing::{info, Instrument, Span};

/// What a run should update
#[derive(Debug, Clone, Copy, Default)]
pub struct PublishOptions {
    /// Write each participant's gameweek score to the points worksheet
    pub update_points: bool,
    /// Write the league table and publish the notification
    pub update_rank: bool,
    pub dry_run: bool,
    pub format: MessageFormat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The current gameweek is already in the completion store
    AlreadyPublished { period: u32 },
    /// Fixture results are not final upstream yet
    NotYetResolvable { period: u32, reasons: Vec<String> },
    Published { period: u32, strategy: Strategy, participants: usize, marked: bool },
}

pub struct StandingsPublisher<A: LeagueApi + ?Sized> {
    api: Arc<A>,
    tracker: Arc<dyn CompletionStore>,
    sheet: Arc<dyn SpreadsheetSink>,
    notifier: Arc<dyn Notifier>,
    span: Span,
}

impl<A: LeagueApi + ?Sized> StandingsPublisher<A> {
    pub fn new(
        api: Arc<A>,
        tracker: Arc<dyn CompletionStore>,
        sheet: Arc<dyn SpreadsheetSink>,
        notifier: Arc<dyn Notifier>,
        span: Span,
    ) -> Self {
        Self { api, tracker, sheet, notifier, span }
    }

    pub async fn run(&self, options: &PublishOptions) -> Result<RunOutcome> {
        self.publish(options).instrument(self.span.clone()).await
    }

    async fn publish(&self, options: &PublishOptions) -> Result<RunOutcome> {
        let session = LeagueSession::open(Arc::clone(&self.api), self.span.clone())
            .await
            .context("Failed to open league session")?;

        let period = session.current_gameweek();
        if let Some(next) = session.next_gameweek() {
            info!("Gameweek {} is next", next);
        }

        if self.tracker.is_marked(period).await.context("Failed to read completion store")? {
            info!("Gameweek {} standings already published", period);
            return Ok(RunOutcome::AlreadyPublished { period });
        }

        let retrieved = match session.retrieve_fixtures().await.context("Failed to retrieve fixtures")? {
            RetrievalOutcome::Resolved(retrieved) => retrieved,
            RetrievalOutcome::NotYetResolvable { period, reasons } => {
                info!("Gameweek {} results are not final yet, nothing to publish", period);
                return Ok(RunOutcome::NotYetResolvable { period, reasons });
            }
        };
        info!(
            "Retrieved {} fixtures with the {} strategy",
            retrieved.batches.fixture_count(),
            retrieved.strategy
        );

        let table = aggregate_retrieval(&retrieved);
        info!("{} participants", table.len());
        for participant in table.iter() {
            info!("{},{}", participant.team_name, participant.name);
        }

        // Everything that can fail on bad data runs before any sink is touched
        let points: Vec<(String, i64)> =
            table.iter().map(|p| (p.name.clone(), p.period_points(period))).collect();
        let ranked = rank(&table, period);
        let message = if options.update_rank {
            Some(build_message(options.format, &table, &ranked, period)?)
        } else {
            None
        };

        if options.update_points {
            self.sheet
                .update_period_points(period, &points)
                .await
                .context("Failed to update gameweek points")?;
        }

        if let Some(message) = message {
            self.sheet.update_rank_table(&ranked).await.context("Failed to update rank table")?;
            self.notifier.publish(&message).await.context("Failed to publish standings")?;
        }

        let marked = options.update_points && options.update_rank && !options.dry_run;
        if marked {
            self.tracker.mark(period).await.context("Failed to mark gameweek as published")?;
        }

        Ok(RunOutcome::Published {
            period,
            strategy: retrieved.strategy,
            participants: table.len(),
            marked,
        })
    }
}
