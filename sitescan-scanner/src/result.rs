use crate::error::FailureKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// One visited page. `parent` is the page that first discovered it and is
/// `None` for the seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub url: Url,
    pub out_links: Vec<Url>,
    pub resources: Vec<Url>,
    pub fetch_duration: Duration,
    pub parent: Option<Url>,
}

impl Page {
    pub fn new(url: Url, parent: Option<Url>) -> Self {
        Self {
            url,
            out_links: Vec::new(),
            resources: Vec::new(),
            fetch_duration: Duration::from_secs(0),
            parent,
        }
    }
}

/// A descendant URL that was claimed but whose fetch failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchFailure {
    pub url: Url,
    pub parent: Option<Url>,
    pub kind: FailureKind,
    pub message: String,
}

/// What a single page scan hands to the aggregator.
#[derive(Debug, Clone)]
pub enum ScanOutcome {
    Page(Page),
    Failed(BranchFailure),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanResult {
    pub pages: HashMap<Url, Page>,
    pub failures: Vec<BranchFailure>,
}

impl ScanResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: ScanOutcome) {
        match outcome {
            ScanOutcome::Page(page) => {
                self.pages.insert(page.url.clone(), page);
            }
            ScanOutcome::Failed(failure) => self.failures.push(failure),
        }
    }

    /// Folds another scan's pages and failures into this one. Pages already
    /// present keep their first record.
    pub fn merge(&mut self, other: ScanResult) {
        for (url, page) in other.pages {
            self.pages.entry(url).or_insert(page);
        }
        self.failures.extend(other.failures);
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn get(&self, url: &Url) -> Option<&Page> {
        self.pages.get(url)
    }
}
