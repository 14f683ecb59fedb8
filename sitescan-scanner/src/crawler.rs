use crate::error::{Result, ScanError};
use crate::extract::{extract_links, extract_resources};
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::limiter::FetchLimiter;
use crate::registry::VisitedRegistry;
use crate::result::{BranchFailure, Page, ScanOutcome, ScanResult};
use crate::validate::{UrlFilter, same_host, validate_url};
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, info, warn};
use url::Url;

pub type ProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

pub const DEFAULT_CONCURRENCY_LIMIT: usize = 4;
pub const DEFAULT_MAX_TASKS: usize = 64;
const AGGREGATOR_CAPACITY: usize = 32;

/// Options for one domain scan.
#[derive(Clone)]
pub struct ScanOptions {
    pub root_url: String,
    /// In-scope predicate. `None` means "same host as the root".
    pub url_filter: Option<UrlFilter>,
    /// Maximum simultaneous fetches.
    pub concurrency_limit: usize,
    /// Maximum simultaneously spawned scan tasks.
    pub max_tasks: usize,
}

impl ScanOptions {
    pub fn new(root_url: impl Into<String>) -> Self {
        Self {
            root_url: root_url.into(),
            url_filter: None,
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
            max_tasks: DEFAULT_MAX_TASKS,
        }
    }

    pub fn with_url_filter(mut self, filter: UrlFilter) -> Self {
        self.url_filter = Some(filter);
        self
    }

    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit;
        self
    }

    pub fn with_max_tasks(mut self, max_tasks: usize) -> Self {
        self.max_tasks = max_tasks;
        self
    }
}

enum Delivery {
    Outcome(ScanOutcome),
    Finish,
}

/// Everything a scan task needs, shared by every task of one scan.
struct ScanContext<F: Fetcher> {
    fetcher: Arc<F>,
    registry: VisitedRegistry,
    limiter: FetchLimiter,
    task_slots: Arc<Semaphore>,
    url_filter: UrlFilter,
    deliveries: mpsc::Sender<Delivery>,
    progress_callback: Option<ProgressCallback>,
}

impl<F: Fetcher> ScanContext<F> {
    async fn deliver(&self, outcome: ScanOutcome) {
        if self.deliveries.send(Delivery::Outcome(outcome)).await.is_err() {
            warn!("Result aggregator is gone, outcome discarded");
        }
    }
}

pub struct DomainScanner<F: Fetcher = HttpFetcher> {
    fetcher: Arc<F>,
    progress_callback: Option<ProgressCallback>,
}

impl DomainScanner<HttpFetcher> {
    pub fn new() -> Self {
        Self::with_fetcher(HttpFetcher::new())
    }

    pub fn with_timeout(timeout_secs: u64) -> Self {
        Self::with_fetcher(HttpFetcher::with_timeout(timeout_secs))
    }
}

impl Default for DomainScanner<HttpFetcher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Fetcher> DomainScanner<F> {
    pub fn with_fetcher(fetcher: F) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            progress_callback: None,
        }
    }

    /// Called with each URL just before it is fetched.
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Crawls everything reachable from `options.root_url` that passes the
    /// filter.
    ///
    /// Only root failures are returned as errors: an invalid root URL, or a
    /// root that cannot be fetched successfully. Failures below the root are
    /// listed in [`ScanResult::failures`] and their subtrees are skipped.
    pub async fn scan(&self, options: ScanOptions) -> Result<ScanResult> {
        let root = validate_url(&options.root_url)?;
        info!(
            "Starting scan of {} ({} concurrent fetches, {} tasks)",
            root, options.concurrency_limit, options.max_tasks
        );

        // Reachability probe
        self.fetcher.fetch(&root).await?;

        let url_filter = options
            .url_filter
            .clone()
            .unwrap_or_else(|| same_host(&root));

        let (tx, rx) = mpsc::channel(AGGREGATOR_CAPACITY);
        let aggregator = tokio::spawn(aggregate(rx));

        let ctx = Arc::new(ScanContext {
            fetcher: self.fetcher.clone(),
            registry: VisitedRegistry::new(),
            limiter: FetchLimiter::new(options.concurrency_limit),
            task_slots: Arc::new(Semaphore::new(options.max_tasks.max(1))),
            url_filter,
            deliveries: tx,
            progress_callback: self.progress_callback.clone(),
        });

        scan_page(ctx.clone(), root, None).await;

        ctx.deliveries
            .send(Delivery::Finish)
            .await
            .map_err(|_| ScanError::AggregatorClosed)?;
        drop(ctx);

        let result = aggregator.await?;
        info!(
            "Scan complete. Visited {} pages, {} failed branches",
            result.pages.len(),
            result.failures.len()
        );
        Ok(result)
    }
}

/// Scans `options.root_url` with the default HTTP fetcher.
pub async fn scan_domain(options: ScanOptions) -> Result<ScanResult> {
    DomainScanner::new().scan(options).await
}

async fn aggregate(mut rx: mpsc::Receiver<Delivery>) -> ScanResult {
    let mut result = ScanResult::new();
    while let Some(delivery) = rx.recv().await {
        match delivery {
            Delivery::Outcome(outcome) => result.record(outcome),
            Delivery::Finish => break,
        }
    }
    result
}

/// Scans one URL and its whole in-scope subtree.
///
/// The returned future resolves only after every descendant outcome and then
/// this page's own outcome have been handed to the aggregator.
fn scan_page<F: Fetcher>(
    ctx: Arc<ScanContext<F>>,
    url: Url,
    parent: Option<Url>,
) -> BoxFuture<'static, ()> {
    async move {
        if ctx.registry.contains(&url).await {
            debug!("Already visited {}", url);
            return;
        }
        if !(ctx.url_filter)(&url) {
            debug!("Out of scope {}", url);
            return;
        }
        if !ctx.registry.claim(&url).await {
            debug!("Claimed by another task {}", url);
            return;
        }

        if let Some(ref callback) = ctx.progress_callback {
            callback(url.to_string());
        }

        let fetched = {
            let _permit = ctx.limiter.acquire().await;
            ctx.fetcher.fetch(&url).await
        };

        let fetched = match fetched {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!("Dropping branch {}: {}", url, e);
                ctx.deliver(ScanOutcome::Failed(BranchFailure {
                    url,
                    parent,
                    kind: e.kind(),
                    message: e.to_string(),
                }))
                .await;
                return;
            }
        };

        // Relative references resolve against where the body was served from.
        let base = fetched.final_url.clone().unwrap_or_else(|| url.clone());
        let mut page = Page::new(url, parent);
        page.out_links = extract_links(&base, &fetched.body);
        page.resources = extract_resources(&base, &fetched.body);
        page.fetch_duration = fetched.elapsed;
        debug!(
            "{}: {} links, {} resources",
            page.url,
            page.out_links.len(),
            page.resources.len()
        );

        scan_children(&ctx, &page).await;
        ctx.deliver(ScanOutcome::Page(page)).await;
    }
    .boxed()
}

/// Starts a scan for every out-link and waits for all of them.
///
/// A child runs as its own task while a task slot is free; otherwise it is
/// polled inline by this task, so a parent never waits on a slot held by its
/// own descendants.
async fn scan_children<F: Fetcher>(ctx: &Arc<ScanContext<F>>, page: &Page) {
    let mut children: FuturesUnordered<BoxFuture<'static, ()>> = FuturesUnordered::new();

    for link in &page.out_links {
        if ctx.registry.contains(link).await || !(ctx.url_filter)(link) {
            continue;
        }

        let child = scan_page(ctx.clone(), link.clone(), Some(page.url.clone()));
        match ctx.task_slots.clone().try_acquire_owned() {
            Ok(slot) => {
                let handle = tokio::spawn(async move {
                    let _slot = slot;
                    child.await;
                });
                let ctx = ctx.clone();
                let link = link.clone();
                let parent = page.url.clone();
                children.push(
                    async move {
                        if let Err(e) = handle.await {
                            let e = ScanError::from(e);
                            warn!("Scan task for {} failed: {}", link, e);
                            ctx.deliver(ScanOutcome::Failed(BranchFailure {
                                url: link,
                                parent: Some(parent),
                                kind: e.kind(),
                                message: e.to_string(),
                            }))
                            .await;
                        }
                    }
                    .boxed(),
                );
            }
            Err(_) => children.push(child),
        }
    }

    while children.next().await.is_some() {}
}
