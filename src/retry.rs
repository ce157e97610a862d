//! Retry decorator for a [`Transport`].
//!
//! Adapters never retry on their own. Wrapping the transport keeps the retry
//! policy in one place: connection errors, timeouts, HTTP 429 and 5xx are
//! retried with exponential backoff; other 4xx and malformed bodies are not.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;
use url::Url;

use crate::config::RetryConfig;
use crate::error::Result;
use crate::transport::Transport;

pub struct RetryTransport<T> {
    inner: T,
    max_retries: u32,
    base_delay: Duration,
}

impl<T: Transport> RetryTransport<T> {
    pub fn new(inner: T, config: &RetryConfig) -> Self {
        Self {
            inner,
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.base_delay_ms),
        }
    }

    async fn send<F, Fut>(&self, url: &Url, request: F) -> Result<String>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<String>>,
    {
        let mut attempt = 0;
        loop {
            match request().await {
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    let delay = self.base_delay.saturating_mul(2u32.saturating_pow(attempt));
                    attempt += 1;
                    warn!(
                        %url,
                        attempt,
                        max_retries = self.max_retries,
                        ?delay,
                        error = %e,
                        "transient failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                other => return other,
            }
        }
    }
}

#[async_trait]
impl<T: Transport> Transport for RetryTransport<T> {
    async fn get(&self, url: &Url) -> Result<String> {
        self.send(url, || self.inner.get(url)).await
    }

    async fn post_json(&self, url: &Url, body: &Value) -> Result<String> {
        self.send(url, || self.inner.post_json(url, body)).await
    }
}
