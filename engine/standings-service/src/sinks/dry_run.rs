//! Sinks that only log what would be written

use super::{Notifier, SinkError, SpreadsheetSink};
use async_trait::async_trait;
use standings_engine::RankedEntry;
use tracing::info;

#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingSheet;

#[async_trait]
impl SpreadsheetSink for LoggingSheet {
    async fn update_period_points(
        &self,
        period: u32,
        points: &[(String, i64)],
    ) -> Result<(), SinkError> {
        for (name, score) in points {
            info!("[dry run] gameweek {} points: {} = {}", period, name, score);
        }
        Ok(())
    }

    async fn update_rank_table(&self, table: &[RankedEntry]) -> Result<(), SinkError> {
        for e in table {
            info!(
                "[dry run] rank {}: {} [{}] {}-{}-{} {} pts",
                e.rank, e.name, e.team_name, e.wins, e.draws, e.losses, e.league_points
            );
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNotifier;

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn publish(&self, payload: &str) -> Result<(), SinkError> {
        info!("[dry run] notification payload:\n{}", payload);
        Ok(())
    }
}
