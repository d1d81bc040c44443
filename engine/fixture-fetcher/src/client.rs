//! FPL API client

use crate::config::FetcherConfig;
use crate::models::*;
use crate::{FetcherError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Upstream league data the retriever needs
#[async_trait]
pub trait LeagueApi: Send + Sync {
    /// All gameweeks of the season
    async fn gameweeks(&self) -> Result<Vec<Gameweek>>;

    /// Fixtures for one gameweek
    async fn fixtures_for_period(&self, period: u32) -> Result<Vec<H2hFixture>>;

    /// Fixtures for one gameweek, asking for an explicit results page
    async fn fixtures_for_period_page(&self, period: u32, page: u32) -> Result<Vec<H2hFixture>>;

    /// Full fixture history of the league
    async fn all_fixtures(&self) -> Result<Vec<H2hFixture>>;
}

#[async_trait]
impl<T: LeagueApi + ?Sized> LeagueApi for Arc<T> {
    async fn gameweeks(&self) -> Result<Vec<Gameweek>> {
        (**self).gameweeks().await
    }

    async fn fixtures_for_period(&self, period: u32) -> Result<Vec<H2hFixture>> {
        (**self).fixtures_for_period(period).await
    }

    async fn fixtures_for_period_page(&self, period: u32, page: u32) -> Result<Vec<H2hFixture>> {
        (**self).fixtures_for_period_page(period, page).await
    }

    async fn all_fixtures(&self) -> Result<Vec<H2hFixture>> {
        (**self).all_fixtures().await
    }
}

/// Fantasy Premier League HTTP client
#[derive(Debug)]
pub struct FplClient {
    config: FetcherConfig,
    client: Client,
}

impl FplClient {
    /// Create a new client; the timeout applies to every request
    pub fn new(config: FetcherConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        if let Some(cookie) = config.session_cookie() {
            let value = HeaderValue::from_str(&cookie).map_err(|_| FetcherError::InvalidConfig {
                message: format!("{} is not a valid header value", config.session_cookie_env),
            })?;
            headers.insert(COOKIE, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()?;

        Ok(Self { config, client })
    }

    pub fn league_id(&self) -> u64 {
        self.config.league_id
    }

    fn matches_url(&self) -> String {
        format!("{}/leagues-h2h-matches/league/{}/", self.config.api_base_url, self.config.league_id)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        debug!("GET {} {:?}", url, query);
        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetcherError::Api { status: status.as_u16(), endpoint: url.to_string() });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn matches_page(&self, query: &[(&str, String)]) -> Result<H2hMatchesPage> {
        self.get_json(&self.matches_url(), query).await
    }
}

#[async_trait]
impl LeagueApi for FplClient {
    async fn gameweeks(&self) -> Result<Vec<Gameweek>> {
        let url = format!("{}/bootstrap-static/", self.config.api_base_url);
        let bootstrap: BootstrapStatic = self.get_json(&url, &[]).await?;
        info!("Fetched {} gameweeks", bootstrap.events.len());
        Ok(bootstrap.events)
    }

    async fn fixtures_for_period(&self, period: u32) -> Result<Vec<H2hFixture>> {
        let page = self.matches_page(&[("event", period.to_string())]).await?;
        Ok(page.results.into_iter().map(H2hFixture::from).collect())
    }

    async fn fixtures_for_period_page(&self, period: u32, page: u32) -> Result<Vec<H2hFixture>> {
        let page = self
            .matches_page(&[("event", period.to_string()), ("page", page.to_string())])
            .await?;
        Ok(page.results.into_iter().map(H2hFixture::from).collect())
    }

    async fn all_fixtures(&self) -> Result<Vec<H2hFixture>> {
        let mut fixtures = Vec::new();
        let mut page_number = 1u32;

        loop {
            let page = self.matches_page(&[("page", page_number.to_string())]).await?;
            debug!("Matches page {} returned {} fixtures", page.page, page.results.len());
            let has_next = page.has_next;
            fixtures.extend(page.results.into_iter().map(H2hFixture::from));

            if !has_next {
                break;
            }
            page_number += 1;
        }

        info!(
            "Fetched {} fixtures for league {} across {} page(s)",
            fixtures.len(),
            self.config.league_id,
            page_number
        );
        Ok(fixtures)
    }
}
