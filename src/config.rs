//! Client configuration.
//!
//! Every field has a default, so an empty TOML file (or none at all) yields a
//! client that talks to the public upstreams.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

/// Errors raised while loading or validating configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("endpoint {name} is not a valid url ({url}): {source}")]
    InvalidEndpoint {
        name: &'static str,
        url: String,
        source: url::ParseError,
    },

    #[error("endpoint {name} must be http or https: {url}")]
    UnsupportedScheme { name: &'static str, url: String },

    #[error("invalid config: {0}")]
    Validation(String),
}

/// Root configuration for a [`crate::StatsClient`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// User-Agent header for every outbound request
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub endpoints: Endpoints,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            retry: RetryConfig::default(),
            endpoints: Endpoints::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration or return the default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            warn!(path = ?path.as_ref(), error = %e, "config load failed, using defaults");
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Validation("user_agent is empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "timeout_secs must be > 0".to_string(),
            ));
        }
        self.endpoints.resolve()?;
        Ok(())
    }
}

/// Retry policy for outbound requests. Zero retries disables the decorator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default)]
    pub max_retries: u32,

    /// Delay before the first retry; doubles on each attempt
    #[serde(default = "defaults::base_delay")]
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay_ms: defaults::base_delay(),
        }
    }
}

/// Upstream base URLs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub codeforces_api: String,
    pub codechef: String,
    pub leetcode: String,
    pub leetcode_graphql: String,
    pub leetcode_stats_api: String,
    pub gfg_stats_api: String,
    pub gfg_potd: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            codeforces_api: "https://codeforces.com/api/".to_string(),
            codechef: "https://www.codechef.com/".to_string(),
            leetcode: "https://leetcode.com/".to_string(),
            leetcode_graphql: "https://leetcode.com/graphql".to_string(),
            leetcode_stats_api: "https://leetcode-stats-api.herokuapp.com/".to_string(),
            gfg_stats_api: "https://geeks-for-geeks-stats-api.vercel.app/".to_string(),
            gfg_potd: "https://practiceapi.geeksforgeeks.org/api/vr/problems-of-day/problem/today"
                .to_string(),
        }
    }
}

/// [`Endpoints`] parsed into URLs.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedEndpoints {
    pub codeforces_api: Url,
    pub codechef: Url,
    pub leetcode: Url,
    pub leetcode_graphql: Url,
    pub leetcode_stats_api: Url,
    pub gfg_stats_api: Url,
    pub gfg_potd: Url,
}

impl Endpoints {
    pub(crate) fn resolve(&self) -> Result<ResolvedEndpoints, ConfigError> {
        Ok(ResolvedEndpoints {
            codeforces_api: parse_endpoint("codeforces_api", &self.codeforces_api)?,
            codechef: parse_endpoint("codechef", &self.codechef)?,
            leetcode: parse_endpoint("leetcode", &self.leetcode)?,
            leetcode_graphql: parse_endpoint("leetcode_graphql", &self.leetcode_graphql)?,
            leetcode_stats_api: parse_endpoint("leetcode_stats_api", &self.leetcode_stats_api)?,
            gfg_stats_api: parse_endpoint("gfg_stats_api", &self.gfg_stats_api)?,
            gfg_potd: parse_endpoint("gfg_potd", &self.gfg_potd)?,
        })
    }
}

fn parse_endpoint(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidEndpoint {
        name,
        url: raw.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ConfigError::UnsupportedScheme {
            name,
            url: raw.to_string(),
        }),
    }
}

mod defaults {
    pub fn user_agent() -> String {
        concat!("cp-stats/", env!("CARGO_PKG_VERSION")).to_string()
    }

    pub fn timeout() -> u64 {
        10
    }

    pub fn base_delay() -> u64 {
        500
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.retry.max_retries, 0);
    }

    #[test]
    fn test_load_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
timeout_secs = 5

[retry]
max_retries = 2

[endpoints]
codeforces_api = "http://localhost:8080/api/"
"#
        )
        .unwrap();

        let config = ClientConfig::load(file.path()).unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.retry.max_retries, 2);
        assert_eq!(config.retry.base_delay_ms, 500);
        assert_eq!(config.endpoints.codeforces_api, "http://localhost:8080/api/");
        assert_eq!(config.endpoints.codechef, "https://www.codechef.com/");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ClientConfig::default();
        config.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let mut config = ClientConfig::default();
        config.endpoints.gfg_potd = "not a url".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidEndpoint { name: "gfg_potd", .. })
        ));

        let mut config = ClientConfig::default();
        config.endpoints.codechef = "ftp://www.codechef.com/".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnsupportedScheme { .. })
        ));
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let config = ClientConfig::load_or_default("/definitely/not/here.toml");
        assert_eq!(config, ClientConfig::default());
    }
}
