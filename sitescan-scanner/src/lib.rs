pub mod crawler;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod limiter;
pub mod registry;
pub mod result;
pub mod validate;

pub use crawler::{DomainScanner, ProgressCallback, ScanOptions, scan_domain};
pub use error::{FailureKind, ScanError};
pub use fetcher::{FetchResult, Fetcher, HttpFetcher};
pub use result::{BranchFailure, Page, ScanResult};
pub use validate::{UrlFilter, any_host, same_host, validate_url};
