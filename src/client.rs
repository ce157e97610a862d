use std::sync::Arc;

use tracing::instrument;
use url::Url;

use crate::config::{ClientConfig, ConfigError, Endpoints, ResolvedEndpoints};
use crate::error::Result;
use crate::model::*;
use crate::retry::RetryTransport;
use crate::scraper;
use crate::transport::{ReqwestTransport, Transport};

/// The main entry point for fetching platform data.
///
/// `StatsClient` wraps a [`Transport`] and exposes one method per upstream
/// operation. Every call is independent: nothing is cached or shared between
/// calls, and no call retries unless the transport does.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// use cp_stats::StatsClient;
///
/// let client = StatsClient::new()?;
/// let user = client.get_codeforces_user("tourist").await?;
/// println!("{} is rated {:?}", user.handle, user.rating);
/// # Ok(())
/// # }
/// ```
pub struct StatsClient {
    transport: Arc<dyn Transport>,
    endpoints: ResolvedEndpoints,
}

impl StatsClient {
    /// Create a new client with default settings.
    pub fn new() -> std::result::Result<Self, ConfigError> {
        Self::from_config(&ClientConfig::default())
    }

    /// Create a client from configuration, adding the retry decorator when
    /// `retry.max_retries` is non-zero.
    pub fn from_config(config: &ClientConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let http = ReqwestTransport::from_config(config)?;
        let transport: Arc<dyn Transport> = if config.retry.max_retries > 0 {
            Arc::new(RetryTransport::new(http, &config.retry))
        } else {
            Arc::new(http)
        };
        Self::with_transport(transport, &config.endpoints)
    }

    /// Create a client using the provided transport.
    ///
    /// Use this to route requests through a custom HTTP stack.
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        endpoints: &Endpoints,
    ) -> std::result::Result<Self, ConfigError> {
        Ok(Self {
            transport,
            endpoints: endpoints.resolve()?,
        })
    }

    /// Base URL used to build canonical LeetCode problem links.
    pub fn leetcode_base(&self) -> &Url {
        &self.endpoints.leetcode
    }

    /// Fetch a Codeforces user's rating profile.
    #[instrument(skip(self))]
    pub async fn get_codeforces_user(&self, handle: &str) -> Result<CodeforcesUser> {
        scraper::codeforces::get_user(
            self.transport.as_ref(),
            &self.endpoints.codeforces_api,
            handle,
        )
        .await
    }

    /// Fetch Codeforces contests that have not started yet.
    #[instrument(skip(self))]
    pub async fn get_codeforces_upcoming_contests(&self) -> Result<Vec<CodeforcesContest>> {
        scraper::codeforces::get_upcoming_contests(
            self.transport.as_ref(),
            &self.endpoints.codeforces_api,
        )
        .await
    }

    /// Fetch and extract a CodeChef profile page.
    #[instrument(skip(self))]
    pub async fn get_codechef_profile(&self, handle: &str) -> Result<CodeChefProfile> {
        scraper::codechef::get_profile(self.transport.as_ref(), &self.endpoints.codechef, handle)
            .await
    }

    /// Fetch all four CodeChef contest buckets.
    #[instrument(skip(self))]
    pub async fn get_codechef_contests(&self) -> Result<CodeChefContests> {
        scraper::codechef::get_contests(self.transport.as_ref(), &self.endpoints.codechef).await
    }

    /// Fetch a LeetCode user's solved-problem statistics.
    #[instrument(skip(self))]
    pub async fn get_leetcode_stats(&self, handle: &str) -> Result<LeetCodeStats> {
        scraper::leetcode::get_stats(
            self.transport.as_ref(),
            &self.endpoints.leetcode_stats_api,
            handle,
        )
        .await
    }

    /// Fetch today's LeetCode daily challenge.
    #[instrument(skip(self))]
    pub async fn get_leetcode_potd(&self) -> Result<LeetCodePotd> {
        scraper::leetcode::get_potd(self.transport.as_ref(), &self.endpoints.leetcode_graphql)
            .await
    }

    /// Fetch a GeeksForGeeks user's solved-problem counts.
    #[instrument(skip(self))]
    pub async fn get_gfg_stats(&self, handle: &str) -> Result<GfgStats> {
        scraper::gfg::get_stats(self.transport.as_ref(), &self.endpoints.gfg_stats_api, handle)
            .await
    }

    /// Fetch today's GeeksForGeeks problem.
    #[instrument(skip(self))]
    pub async fn get_gfg_potd(&self) -> Result<GfgPotd> {
        scraper::gfg::get_potd(self.transport.as_ref(), &self.endpoints.gfg_potd).await
    }
}
