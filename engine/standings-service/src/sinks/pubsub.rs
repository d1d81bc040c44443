//! Google Cloud Pub/Sub publisher

use super::{access_token, api_error, Notifier, SinkError};
use crate::config::PubSubConfig;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Serialize)]
struct PublishRequest {
    messages: Vec<PubSubMessage>,
}

#[derive(Debug, Serialize)]
struct PubSubMessage {
    data: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublishResponse {
    #[serde(default)]
    message_ids: Vec<String>,
}

#[derive(Debug)]
pub struct PubSubNotifier {
    config: PubSubConfig,
    token: String,
    client: Client,
}

impl PubSubNotifier {
    pub fn new(
        config: PubSubConfig,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SinkError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { config, token: token.into(), client })
    }

    /// Create a publisher authenticated with the token named in the config
    pub fn from_env(config: PubSubConfig, timeout: Duration) -> Result<Self, SinkError> {
        let token = access_token(&config.access_token_env)?;
        Self::new(config, token, timeout)
    }

    fn publish_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/topics/{}:publish",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.project_id,
            self.config.topic_id
        )
    }
}

fn publish_body(payload: &str) -> PublishRequest {
    PublishRequest { messages: vec![PubSubMessage { data: BASE64.encode(payload.as_bytes()) }] }
}

#[async_trait]
impl Notifier for PubSubNotifier {
    async fn publish(&self, payload: &str) -> Result<(), SinkError> {
        let url = self.publish_url();
        let body = serde_json::to_string(&publish_body(payload))?;
        debug!("POST {} ({} byte payload)", url, payload.len());

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

        let published: PublishResponse = serde_json::from_str(&response.text().await?)?;
        info!(
            "Published standings to topic {} (message ids: {:?})",
            self.config.topic_id, published.message_ids
        );
        Ok(())
    }
}
