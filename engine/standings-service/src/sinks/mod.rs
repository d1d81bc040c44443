//! Output channels: the league spreadsheet and the notification topic

pub mod dry_run;
pub mod pubsub;
pub mod sheets;

use async_trait::async_trait;
use standings_engine::RankedEntry;
use thiserror::Error;

pub use dry_run::{LoggingNotifier, LoggingSheet};
pub use pubsub::PubSubNotifier;
pub use sheets::GoogleSheetsClient;

/// Errors raised while writing to an output channel
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Api { status: u16, endpoint: String, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No cell containing {name:?} in worksheet {worksheet:?}")]
    CellNotFound { worksheet: String, name: String },

    #[error("Access token not found in environment variable {env_var}")]
    MissingCredentials { env_var: String },
}

/// Spreadsheet holding gameweek points and the league table
#[async_trait]
pub trait SpreadsheetSink: Send + Sync {
    /// Write each participant's score for `period` next to their name
    async fn update_period_points(
        &self,
        period: u32,
        points: &[(String, i64)],
    ) -> Result<(), SinkError>;

    /// Replace the league table rows
    async fn update_rank_table(&self, table: &[RankedEntry]) -> Result<(), SinkError>;
}

/// Channel receiving the weekly standings message
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(&self, payload: &str) -> Result<(), SinkError>;
}

/// Read an access token from the environment
pub(crate) fn access_token(env_var: &str) -> Result<String, SinkError> {
    std::env::var(env_var)
        .ok()
        .filter(|token| !token.trim().is_empty())
        .ok_or_else(|| SinkError::MissingCredentials { env_var: env_var.to_string() })
}

/// Error for a non-success response, keeping the body for diagnostics
pub(crate) async fn api_error(endpoint: &str, response: reqwest::Response) -> SinkError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    SinkError::Api { status, endpoint: endpoint.to_string(), body }
}
