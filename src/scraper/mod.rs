pub(crate) mod codechef;
pub(crate) mod codeforces;
pub(crate) mod gfg;
pub(crate) mod leetcode;

use ::scraper::{ElementRef, Selector};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::{Result, StatsError};
use crate::model::Platform;
use crate::transport::Transport;

/// Reject an empty handle before any request is made.
pub(crate) fn require_handle(platform: Platform, handle: &str) -> Result<&str> {
    let handle = handle.trim();
    if handle.is_empty() {
        return Err(StatsError::NotConfigured { platform });
    }
    Ok(handle)
}

/// Append path segments to `base`. Segments are percent-encoded.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

pub(crate) fn parse_json<T: DeserializeOwned>(url: &Url, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| StatsError::Json {
        url: url.to_string(),
        source: e,
    })
}

/// Fetch a URL and parse the response body as JSON.
pub(crate) async fn get_json<T: DeserializeOwned>(transport: &dyn Transport, url: &Url) -> Result<T> {
    debug!(%url, "fetching json");
    let body = transport.get(url).await?;
    parse_json(url, &body)
}

/// POST a JSON body and parse the response body as JSON.
pub(crate) async fn post_json<T: DeserializeOwned>(
    transport: &dyn Transport,
    url: &Url,
    payload: &Value,
) -> Result<T> {
    debug!(%url, "posting json");
    let body = transport.post_json(url, payload).await?;
    parse_json(url, &body)
}

/// Extract trimmed text content from the first element matching `selector`
/// inside `element`. Returns an empty string if nothing matches.
pub(crate) fn select_text(element: &ElementRef, selector: &Selector) -> String {
    element
        .select(selector)
        .next()
        .map(|e| element_text(&e))
        .unwrap_or_default()
}

/// All text beneath `element`, joined and trimmed.
pub(crate) fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .trim()
        .replace(['\n', '\t'], "")
}
