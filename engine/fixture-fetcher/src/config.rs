use serde::{Deserialize, Serialize};

use crate::FetcherError;

/// Configuration for talking to the FPL API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Base URL of the FPL API (no trailing slash)
    pub api_base_url: String,

    /// Head-to-head league identifier
    pub league_id: u64,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Name of the environment variable holding an authenticated session cookie
    pub session_cookie_env: String,

    /// User-Agent sent with every request
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://fantasy.premierleague.com/api".to_string(),
            league_id: 0,
            timeout_secs: 30,
            session_cookie_env: "FPL_SESSION_COOKIE".to_string(),
            user_agent: concat!("h2h-standings/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FetcherConfig {
    /// Create a configuration for the given league with default settings
    pub fn for_league(league_id: u64) -> Self {
        Self { league_id, ..Default::default() }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, FetcherError> {
        let mut config = Self::default();

        if let Ok(league_id) = std::env::var("H2H_LEAGUE_ID") {
            config.league_id = league_id.parse().map_err(|_| FetcherError::InvalidConfig {
                message: format!("H2H_LEAGUE_ID is not a number: {league_id}"),
            })?;
        }

        if let Ok(base_url) = std::env::var("FPL_API_BASE_URL") {
            config.api_base_url = base_url;
        }

        config.validate()?;
        Ok(config)
    }

    /// Session cookie from the environment, if one is set
    pub fn session_cookie(&self) -> Option<String> {
        std::env::var(&self.session_cookie_env).ok().filter(|c| !c.trim().is_empty())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), FetcherError> {
        if self.league_id == 0 {
            return Err(FetcherError::InvalidConfig {
                message: "h2h league id must be set".to_string(),
            });
        }

        if self.timeout_secs == 0 {
            return Err(FetcherError::InvalidConfig {
                message: "timeout_secs must be greater than 0".to_string(),
            });
        }

        if !self.api_base_url.starts_with("http") {
            return Err(FetcherError::InvalidConfig {
                message: format!("invalid api_base_url: {}", self.api_base_url),
            });
        }

        Ok(())
    }
}
