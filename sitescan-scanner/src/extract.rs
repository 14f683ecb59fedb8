//! Link and static-resource extraction.
//!
//! Attribute values are resolved against the page URL and kept only when the
//! result is an `http`/`https` URL. Fragments are preserved, so `#top` on
//! `http://example.com/` becomes `http://example.com/#top`.

use crate::validate::is_web_scheme;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("anchor selector"));
static IMAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img[src]").expect("image selector"));
static SCRIPT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script[src]").expect("script selector"));
static STYLESHEET: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"link[rel~="stylesheet"][href]"#).expect("stylesheet selector")
});

/// Raw `href` values of every anchor, in document order, unresolved.
pub fn find_hrefs(markup: &str) -> Vec<String> {
    let document = Html::parse_document(markup);
    attribute_values(&document, &ANCHOR, "href")
}

/// Absolute hyperlinks found in `markup`.
pub fn extract_links(base: &Url, markup: &str) -> Vec<Url> {
    let document = Html::parse_document(markup);
    resolve_all(base, attribute_values(&document, &ANCHOR, "href"))
}

/// Absolute image, script and stylesheet references, in that order.
pub fn extract_resources(base: &Url, markup: &str) -> Vec<Url> {
    let document = Html::parse_document(markup);

    let mut raw = attribute_values(&document, &IMAGE, "src");
    raw.extend(attribute_values(&document, &SCRIPT, "src"));
    raw.extend(attribute_values(&document, &STYLESHEET, "href"));

    resolve_all(base, raw)
}

fn attribute_values(document: &Html, selector: &Selector, attr: &str) -> Vec<String> {
    document
        .select(selector)
        .filter_map(|element| element.value().attr(attr))
        .map(str::to_string)
        .collect()
}

fn resolve_all(base: &Url, raw: Vec<String>) -> Vec<Url> {
    raw.iter()
        .filter_map(|reference| resolve(base, reference))
        .collect()
}

fn resolve(base: &Url, reference: &str) -> Option<Url> {
    let resolved = base.join(reference).ok()?;
    if is_web_scheme(&resolved) {
        Some(resolved)
    } else {
        debug!("Dropping non-web reference {}", reference);
        None
    }
}
