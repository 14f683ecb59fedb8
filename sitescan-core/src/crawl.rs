use indicatif::{ProgressBar, ProgressStyle};
use sitescan_scanner::{
    DomainScanner, ProgressCallback, ScanOptions, ScanResult, UrlFilter, any_host,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Options for configuring a scan run over one or more seeds
pub struct CrawlOptions {
    pub urls: Vec<String>,
    pub concurrency: usize,
    pub max_tasks: usize,
    pub timeout_secs: u64,
    pub follow_mode: FollowMode,
    pub show_progress_bars: bool,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            concurrency: sitescan_scanner::crawler::DEFAULT_CONCURRENCY_LIMIT,
            max_tasks: sitescan_scanner::crawler::DEFAULT_MAX_TASKS,
            timeout_secs: 10,
            follow_mode: FollowMode::SameHost,
            show_progress_bars: false,
        }
    }
}

/// Cross-domain following behavior
pub enum FollowMode {
    /// Stay on the seed's host
    SameHost,
    /// Follow every http/https link
    All,
}

impl FollowMode {
    /// `None` keeps the scanner's same-host default.
    pub fn url_filter(&self) -> Option<UrlFilter> {
        match self {
            FollowMode::SameHost => None,
            FollowMode::All => Some(any_host()),
        }
    }
}

/// Callback for reporting run-level progress messages
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

/// Scans every seed in turn and merges the results.
///
/// A seed that fails at its root is reported through `progress_callback` and
/// skipped. The run fails only when no seed could be scanned.
pub async fn execute_crawl(
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<ScanResult, String> {
    let CrawlOptions {
        urls,
        concurrency,
        max_tasks,
        timeout_secs,
        follow_mode,
        show_progress_bars,
    } = options;

    if urls.is_empty() {
        return Err("No URLs to scan".to_string());
    }

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting scan...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let processed_count = Arc::new(AtomicUsize::new(0));

    let page_callback: ProgressCallback = {
        let pb_clone = progress_bar.clone();
        let count_clone = processed_count.clone();
        Arc::new(move |url: String| {
            let count = count_clone.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(ref pb) = pb_clone {
                pb.set_message(format!("Scanning... {} URLs fetched ({})", count, extract_url_path(&url)));
            }
        })
    };

    let scanner = DomainScanner::with_timeout(timeout_secs).with_progress_callback(page_callback);

    let mut merged = ScanResult::new();
    let mut errors = Vec::new();

    for (idx, url_str) in urls.iter().enumerate() {
        if let Some(ref callback) = progress_callback
            && urls.len() > 1
        {
            callback(format!("Scanning host {}/{}: {}", idx + 1, urls.len(), url_str));
        }

        let mut scan_options = ScanOptions::new(url_str.clone())
            .with_concurrency_limit(concurrency)
            .with_max_tasks(max_tasks);
        if let Some(filter) = follow_mode.url_filter() {
            scan_options = scan_options.with_url_filter(filter);
        }

        match scanner.scan(scan_options).await {
            Ok(result) => {
                if result.is_empty() {
                    warn!("{}: root was reachable but its scan recorded no pages", url_str);
                } else {
                    info!("{}: {} pages", url_str, result.len());
                }
                merged.merge(result);
            }
            Err(e) => {
                warn!("Failed to scan {}: {}", url_str, e);
                if let Some(ref callback) = progress_callback {
                    callback(format!("[!]  Failed to scan {}: {}", url_str, e));
                }
                errors.push(format!("{}: {}", url_str, e));
            }
        }
    }

    if let Some(ref pb) = progress_bar {
        let total = processed_count.load(Ordering::Relaxed);
        pb.finish_with_message(format!("Scan complete! {} URLs fetched", total));
    }

    if errors.len() == urls.len() {
        return Err(errors.join("\n"));
    }

    Ok(merged)
}
