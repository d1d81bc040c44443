//! Google Sheets v4 REST client

use super::{access_token, api_error, SinkError, SpreadsheetSink};
use crate::config::SheetsConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use standings_engine::RankedEntry;
use std::time::Duration;
use tracing::{debug, info};

/// One A1 range and the rows written to it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    pub range: String,
    pub major_dimension: &'static str,
    pub values: Vec<Vec<Value>>,
}

impl ValueRange {
    fn rows(range: String, values: Vec<Vec<Value>>) -> Self {
        Self { range, major_dimension: "ROWS", values }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchUpdateRequest<'a> {
    value_input_option: &'static str,
    data: &'a [ValueRange],
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchGetResponse {
    #[serde(default)]
    value_ranges: Vec<ReadRange>,
}

#[derive(Debug, Default, Deserialize)]
struct ReadRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug)]
pub struct GoogleSheetsClient {
    config: SheetsConfig,
    token: String,
    client: Client,
}

impl GoogleSheetsClient {
    pub fn new(
        config: SheetsConfig,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SinkError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { config, token: token.into(), client })
    }

    /// Create a client authenticated with the token named in the config
    pub fn from_env(config: SheetsConfig, timeout: Duration) -> Result<Self, SinkError> {
        let token = access_token(&config.access_token_env)?;
        Self::new(config, token, timeout)
    }

    fn values_url(&self, method: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values:{}",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.spreadsheet_id,
            method
        )
    }

    /// Every populated cell of a worksheet, row by row
    async fn worksheet_values(&self, worksheet: &str) -> Result<Vec<Vec<Value>>, SinkError> {
        let url = self.values_url("batchGet");
        debug!("GET {} ranges={}", url, worksheet);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("ranges", quote_worksheet(worksheet)), ("majorDimension", "ROWS".into())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(&url, response).await);
        }

        let body: BatchGetResponse = serde_json::from_str(&response.text().await?)?;
        Ok(body.value_ranges.into_iter().next().map(|r| r.values).unwrap_or_default())
    }

    async fn batch_update(&self, data: &[ValueRange]) -> Result<(), SinkError> {
        let url = self.values_url("batchUpdate");
        let body = serde_json::to_string(&BatchUpdateRequest {
            value_input_option: "USER_ENTERED",
            data,
        })?;
        debug!("POST {} ({} ranges)", url, data.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(&url, response).await);
        }
        Ok(())
    }
}

#[async_trait]
impl SpreadsheetSink for GoogleSheetsClient {
    async fn update_period_points(
        &self,
        period: u32,
        points: &[(String, i64)],
    ) -> Result<(), SinkError> {
        let worksheet = &self.config.points_worksheet;
        let grid = self.worksheet_values(worksheet).await?;
        let updates = point_updates(worksheet, &grid, period, points)?;

        self.batch_update(&updates).await?;
        info!("Wrote gameweek {} points for {} participants", period, updates.len());
        Ok(())
    }

    async fn update_rank_table(&self, table: &[RankedEntry]) -> Result<(), SinkError> {
        let Some(update) = rank_update(&self.config.rank_worksheet, table) else {
            return Ok(());
        };

        self.batch_update(std::slice::from_ref(&update)).await?;
        info!("Wrote league table to {}", update.range);
        Ok(())
    }
}

/// Column letters for a zero-based index: 0 → A, 25 → Z, 26 → AA
pub fn column_letters(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// Worksheet name as it must appear in an A1 range
fn quote_worksheet(worksheet: &str) -> String {
    format!("'{}'", worksheet.replace('\'', "''"))
}

/// A1 reference for a zero-based (row, column) cell
pub fn a1_cell(worksheet: &str, row: usize, col: usize) -> String {
    format!("{}!{}{}", quote_worksheet(worksheet), column_letters(col), row + 1)
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

/// First cell (row-major) whose text equals `name`
pub fn find_cell(grid: &[Vec<Value>], name: &str) -> Option<(usize, usize)> {
    grid.iter().enumerate().find_map(|(row, cells)| {
        cells.iter().position(|cell| cell_text(cell) == name).map(|col| (row, col))
    })
}

/// Point cells to write: gameweek `period` lives `period` columns to the
/// right of the participant's name
fn point_updates(
    worksheet: &str,
    grid: &[Vec<Value>],
    period: u32,
    points: &[(String, i64)],
) -> Result<Vec<ValueRange>, SinkError> {
    points
        .iter()
        .map(|(name, score)| {
            let (row, col) = find_cell(grid, name).ok_or_else(|| SinkError::CellNotFound {
                worksheet: worksheet.to_string(),
                name: name.clone(),
            })?;
            let target = a1_cell(worksheet, row, col + period as usize);
            Ok(ValueRange::rows(target, vec![vec![json!(score)]]))
        })
        .collect()
}

/// League table rows starting at A2, below the header row
fn rank_update(worksheet: &str, table: &[RankedEntry]) -> Option<ValueRange> {
    if table.is_empty() {
        return None;
    }

    let rows = table
        .iter()
        .map(|e| {
            vec![
                json!(e.team_name),
                json!(e.name),
                json!(e.wins),
                json!(e.losses),
                json!(e.draws),
                json!(e.league_points),
                json!(e.rank),
            ]
        })
        .collect();

    let range = format!("{}:G{}", a1_cell(worksheet, 1, 0), table.len() + 1);
    Some(ValueRange::rows(range, rows))
}
