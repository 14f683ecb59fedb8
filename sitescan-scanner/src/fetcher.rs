use crate::error::{Result, ScanError};
use reqwest::Client;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

/// Body and timing of one successful retrieval.
///
/// `body` is empty unless the response was classified as HTML.
#[derive(Debug, Clone, Default)]
pub struct FetchResult {
    pub body: String,
    pub elapsed: Duration,
    pub status: u16,
    pub content_type: Option<String>,
    /// Where the body was served from once redirects were followed.
    pub final_url: Option<Url>,
}

/// Network retrieval used by the scanner.
///
/// Implementations return `ScanError::Http` for transport failures and
/// `ScanError::HttpStatus` for non-2xx responses.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<FetchResult>> + Send;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::with_timeout(10)
    }

    pub fn with_timeout(timeout_secs: u64) -> Self {
        let client = Client::builder()
            .user_agent("Sitescan/0.1 (https://github.com/trapdoorsec/sitescan)")
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs((timeout_secs / 2).max(1)))
            .pool_max_idle_per_host(50)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchResult> {
        debug!("Fetching {}", url);

        let start = Instant::now();
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = response.text().await?;
        let elapsed = start.elapsed();

        if !status.is_success() {
            return Err(ScanError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let body = if is_html(content_type.as_deref(), &body) {
            body
        } else {
            debug!("Skipping non-HTML body of {} ({:?})", url, content_type);
            String::new()
        };

        Ok(FetchResult {
            body,
            elapsed,
            status: status.as_u16(),
            content_type,
            final_url: Some(final_url),
        })
    }
}

const HTML_SIGNATURES: [&str; 17] = [
    "<!doctype html",
    "<html",
    "<head",
    "<script",
    "<iframe",
    "<h1",
    "<div",
    "<font",
    "<table",
    "<a",
    "<style",
    "<title",
    "<b",
    "<body",
    "<br",
    "<p",
    "<!--",
];

/// The declared content type wins; without one the body is sniffed.
pub fn is_html(content_type: Option<&str>, body: &str) -> bool {
    match content_type {
        Some(ct) => ct.to_ascii_lowercase().contains("text/html"),
        None => sniff_html(body),
    }
}

fn sniff_html(body: &str) -> bool {
    let head: String = body
        .trim_start()
        .chars()
        .take(16)
        .collect::<String>()
        .to_ascii_lowercase();

    HTML_SIGNATURES.iter().any(|signature| {
        head.strip_prefix(signature)
            .and_then(|rest| rest.chars().next())
            .is_some_and(|next| next == ' ' || next == '>')
    })
}
