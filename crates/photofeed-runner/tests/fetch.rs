use std::sync::Arc;

use photofeed_core::{FeedError, RecordingRenderer, SeedOutcome};
use photofeed_runner::{fetch_manifest, Feed, FeedConfig};
use photofeed_storage::InMemoryStore;
use reqwest::Client;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Serves exactly one canned HTTP response and hands back the raw request.
async fn serve_once(status_line: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.unwrap();
        let mut req = Vec::new();
        let mut buf = [0u8; 1024];
        while !req.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = sock.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            req.extend_from_slice(&buf[..n]);
        }
        let resp = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        sock.write_all(resp.as_bytes()).await.unwrap();
        sock.shutdown().await.ok();
        let _ = tx.send(String::from_utf8_lossy(&req).to_string());
    });
    (format!("http://{addr}/manifest.json"), rx)
}

#[tokio::test]
async fn fetches_with_cache_bypass() {
    let (url, req) = serve_once("200 OK", r#"["a.jpg","b.jpg"]"#).await;
    let out = fetch_manifest(&Client::new(), &url).await.unwrap();
    assert_eq!(out, vec!["a.jpg", "b.jpg"]);

    let req = req.await.unwrap().to_ascii_lowercase();
    assert!(req.starts_with("get /manifest.json"));
    assert!(req.contains("cache-control: no-store"));
}

#[tokio::test]
async fn error_status_is_manifest_unavailable() {
    let (url, _req) = serve_once("404 Not Found", "[]").await;
    let err = fetch_manifest(&Client::new(), &url).await.unwrap_err();
    assert!(matches!(err, FeedError::ManifestUnavailable(_)));
}

#[tokio::test]
async fn malformed_body_is_manifest_unavailable() {
    let (url, _req) = serve_once("200 OK", r#"{"images":["a.jpg"]}"#).await;
    let err = fetch_manifest(&Client::new(), &url).await.unwrap_err();
    assert!(matches!(err, FeedError::ManifestUnavailable(_)));
}

#[tokio::test]
async fn connection_refused_is_manifest_unavailable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let err = fetch_manifest(&Client::new(), &format!("http://{addr}/m.json")).await.unwrap_err();
    assert!(matches!(err, FeedError::ManifestUnavailable(_)));
}

#[tokio::test]
async fn init_fetches_and_renders() {
    let (url, _req) = serve_once("200 OK", r#"["a.jpg","a.jpg","https://x/b.png"]"#).await;
    let mut cfg = FeedConfig::new(url);
    cfg.image_base_url = "https://cdn".into();
    let mut feed = Feed::mount(cfg, Arc::new(InMemoryStore::new()), RecordingRenderer::new());

    assert_eq!(feed.init(&Client::new()).await.unwrap(), SeedOutcome::Seeded);
    assert_eq!(feed.items().unwrap().addresses(), vec!["https://cdn/a.jpg", "https://x/b.png"]);
    assert_eq!(feed.renderer().last_progress(), Some((1, 2)));
}

#[tokio::test]
async fn failed_init_renders_nothing() {
    let (url, _req) = serve_once("500 Internal Server Error", "oops").await;
    let store = Arc::new(InMemoryStore::new());
    let mut feed = Feed::mount(FeedConfig::new(url), store.clone(), RecordingRenderer::new());

    let err = feed.init(&Client::new()).await.unwrap_err();
    assert!(matches!(err, FeedError::ManifestUnavailable(_)));
    assert!(feed.renderer().calls.is_empty());
    assert!(feed.items().is_none());
    assert!(store.is_empty());

    feed.advance();
    assert!(feed.renderer().calls.is_empty());
}
