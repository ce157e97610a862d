use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::{ClientConfig, ConfigError};
use crate::error::{Result, StatsError};

/// Outbound HTTP for the adapters. Returns the raw response body of a 2xx response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<String>;

    async fn post_json(&self, url: &Url, body: &Value) -> Result<String>;
}

/// [`Transport`] backed by a [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a client with the configured user agent and per-request timeout.
    pub fn from_config(config: &ClientConfig) -> std::result::Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http })
    }

    /// Use the provided [`reqwest::Client`] as is.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { http: client }
    }

    async fn read_body(
        url: &Url,
        response: std::result::Result<reqwest::Response, reqwest::Error>,
    ) -> Result<String> {
        let response = response.map_err(|e| StatsError::Http {
            url: url.to_string(),
            source: e,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(StatsError::UnexpectedStatus {
                url: url.to_string(),
                status,
            });
        }

        response.text().await.map_err(|e| StatsError::ResponseBody {
            url: url.to_string(),
            source: e,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<String> {
        debug!(%url, "GET");
        let response = self.http.get(url.clone()).send().await;
        Self::read_body(url, response).await
    }

    async fn post_json(&self, url: &Url, body: &Value) -> Result<String> {
        debug!(%url, "POST");
        let response = self
            .http
            .post(url.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await;
        Self::read_body(url, response).await
    }
}
