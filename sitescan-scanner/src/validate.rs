use crate::error::{Result, ScanError};
use std::sync::Arc;
use url::Url;

/// Decides whether a discovered URL is in scope for recursion.
pub type UrlFilter = Arc<dyn Fn(&Url) -> bool + Send + Sync>;

/// Parses `raw` and accepts it only for the `http` and `https` schemes.
pub fn validate_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| ScanError::InvalidUrl(format!("Not a URL: {}", e)))?;

    if !is_web_scheme(&url) {
        return Err(ScanError::InvalidUrl(format!(
            "Bad Scheme: {}",
            url.scheme()
        )));
    }

    Ok(url)
}

pub(crate) fn is_web_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// Default filter: same host as `root`, regardless of scheme.
///
/// An explicit port is part of the host (`:8080` and `:9090` are different
/// sites); a scheme's default port is not written, so `http://h` and
/// `https://h` still match.
pub fn same_host(root: &Url) -> UrlFilter {
    let host = root.host_str().map(|h| h.to_ascii_lowercase());
    let port = root.port();
    Arc::new(move |url: &Url| match (&host, url.host_str()) {
        (Some(root_host), Some(candidate)) => {
            candidate.eq_ignore_ascii_case(root_host) && url.port() == port
        }
        _ => false,
    })
}

/// Filter that accepts every web URL.
pub fn any_host() -> UrlFilter {
    Arc::new(is_web_scheme)
}
