use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{Result, StatsError};
use crate::model::{GfgPotd, GfgStats, Platform};
use crate::scraper::{get_json, require_handle};
use crate::transport::Transport;

#[instrument(skip(transport, base))]
pub(crate) async fn get_stats(transport: &dyn Transport, base: &Url, handle: &str) -> Result<GfgStats> {
    let handle = require_handle(Platform::Gfg, handle)?;
    let mut url = base.clone();
    url.query_pairs_mut()
        .append_pair("raw", "Y")
        .append_pair("userName", handle);

    let body: Value = get_json(transport, &url).await?;
    let stats = parse_stats(&url, body)?;
    debug!(handle, total = ?stats.total_problems_solved, "parsed gfg stats");
    Ok(stats)
}

/// The proxy reports failures in-band as `{"error": "..."}`.
fn parse_stats(url: &Url, body: Value) -> Result<GfgStats> {
    if let Some(error) = body.get("error") {
        let message = match error {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Err(StatsError::UpstreamStatus {
            platform: Platform::Gfg,
            message,
        });
    }
    let stats: GfgStats = serde_json::from_value(body).map_err(|e| StatsError::Json {
        url: url.to_string(),
        source: e,
    })?;
    if !stats.has_user() {
        let message = stats
            .details
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("response has no user stats")
            .to_string();
        return Err(StatsError::UpstreamStatus {
            platform: Platform::Gfg,
            message,
        });
    }
    Ok(stats)
}

#[instrument(skip(transport, url))]
pub(crate) async fn get_potd(transport: &dyn Transport, url: &Url) -> Result<GfgPotd> {
    let potd: GfgPotd = get_json(transport, url).await?;
    debug!(problem = %potd.problem_name, difficulty = %potd.difficulty, "parsed gfg potd");
    Ok(potd)
}
