//! Service configuration management

use anyhow::{Context, Result};
use fixture_fetcher::FetcherConfig;
use serde::{Deserialize, Serialize};
use standings_engine::MessageFormat;
use std::path::{Path, PathBuf};

/// Prefix of environment variables overriding file settings, e.g.
/// `H2H__SHEETS__SPREADSHEET_ID`
pub const ENV_PREFIX: &str = "H2H";

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Head-to-head league identifier
    pub h2h_league_id: u64,

    /// Marker file listing published gameweeks
    pub gameweekdb_path: PathBuf,

    /// Upstream FPL API settings; `league_id` is taken from `h2h_league_id`
    pub fpl: FetcherConfig,

    pub sheets: SheetsConfig,

    pub pubsub: PubSubConfig,

    pub notification: NotificationConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Google Sheets settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,

    /// Worksheet holding one column per gameweek next to each manager name
    pub points_worksheet: String,

    /// Worksheet receiving the league table
    pub rank_worksheet: String,

    /// Environment variable holding an OAuth access token
    pub access_token_env: String,

    pub api_base_url: String,
}

/// Google Cloud Pub/Sub settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PubSubConfig {
    pub project_id: String,
    pub topic_id: String,

    /// Environment variable holding an OAuth access token
    pub access_token_env: String,

    pub api_base_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Payload layout (compact, sms)
    pub format: MessageFormat,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty, plain)
    pub format: String,

    /// Log file path, rotated daily (if None, logs to stdout only)
    pub file: Option<PathBuf>,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            points_worksheet: "Points".to_string(),
            rank_worksheet: "Rank".to_string(),
            access_token_env: "GOOGLE_SHEETS_ACCESS_TOKEN".to_string(),
            api_base_url: "https://sheets.googleapis.com".to_string(),
        }
    }
}

impl Default for PubSubConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            topic_id: String::new(),
            access_token_env: "GOOGLE_PUBSUB_ACCESS_TOKEN".to_string(),
            api_base_url: "https://pubsub.googleapis.com".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string(), file: None }
    }
}

impl ServiceConfig {
    /// Settings for the FPL client, bound to the configured league
    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig { league_id: self.h2h_league_id, ..self.fpl.clone() }
    }

    /// Validate configuration. Sink settings are only required when the run
    /// actually writes to the sinks.
    pub fn validate(&self, dry_run: bool) -> Result<()> {
        if self.h2h_league_id == 0 {
            return Err(anyhow::anyhow!("h2h_league_id must be set"));
        }

        if self.gameweekdb_path.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("gameweekdb_path must be set"));
        }

        self.fetcher_config().validate().context("Invalid fpl settings")?;

        // Validate log level
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => return Err(anyhow::anyhow!("Invalid log level: {}", self.logging.level)),
        }

        // Validate log format
        match self.logging.format.as_str() {
            "json" | "pretty" | "plain" => {}
            _ => return Err(anyhow::anyhow!("Invalid log format: {}", self.logging.format)),
        }

        if dry_run {
            return Ok(());
        }

        if self.sheets.spreadsheet_id.is_empty() {
            return Err(anyhow::anyhow!("sheets.spreadsheet_id must be set"));
        }
        if self.sheets.points_worksheet.is_empty() || self.sheets.rank_worksheet.is_empty() {
            return Err(anyhow::anyhow!("sheets worksheet names must be set"));
        }
        if self.pubsub.project_id.is_empty() || self.pubsub.topic_id.is_empty() {
            return Err(anyhow::anyhow!("pubsub.project_id and pubsub.topic_id must be set"));
        }

        Ok(())
    }
}

/// Load configuration from `path` overlaid with `H2H__` environment variables.
/// The file format follows its extension (json, toml, ...).
pub fn load_config(path: &Path, dry_run: bool) -> Result<ServiceConfig> {
    tracing::debug!("Loading configuration from file: {:?}", path);

    let config: ServiceConfig = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .with_context(|| format!("Failed to read configuration file: {path:?}"))?
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    config.validate(dry_run)?;

    Ok(config)
}
