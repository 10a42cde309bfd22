use photofeed_core::FeedError;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// Fetches the manifest, bypassing HTTP caches.
///
/// Transport errors, non-success statuses and malformed bodies all map to
/// [`FeedError::ManifestUnavailable`].
pub async fn fetch_manifest(client: &Client, url: &str) -> Result<Vec<String>, FeedError> {
    debug!("fetching manifest {url}");
    let resp = client
        .get(url)
        .header(CACHE_CONTROL, "no-store")
        .header(PRAGMA, "no-cache")
        .send()
        .await
        .map_err(|e| FeedError::manifest(format!("request {url}: {e}")))?
        .error_for_status()
        .map_err(|e| FeedError::manifest(format!("status {url}: {e}")))?;
    let body = resp
        .bytes()
        .await
        .map_err(|e| FeedError::manifest(format!("read body {url}: {e}")))?;
    parse_manifest(&body)
}

/// Parses a manifest body: a JSON array of identifier strings.
///
/// Falsy entries (`null`, `false`, `0`, `""`) are dropped. Any other non-string entry
/// invalidates the document.
pub fn parse_manifest(body: &[u8]) -> Result<Vec<String>, FeedError> {
    let entries: Vec<Value> =
        serde_json::from_slice(body).map_err(|e| FeedError::manifest(format!("parse manifest: {e}")))?;
    let mut out = Vec::with_capacity(entries.len());
    for (i, entry) in entries.into_iter().enumerate() {
        match entry {
            Value::String(s) if s.is_empty() => {}
            Value::String(s) => out.push(s),
            Value::Null | Value::Bool(false) => {}
            Value::Number(n) if n.as_f64() == Some(0.0) => {}
            other => {
                return Err(FeedError::manifest(format!("entry {i} is not a string: {other}")));
            }
        }
    }
    Ok(out)
}
