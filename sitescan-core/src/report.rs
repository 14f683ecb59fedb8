// Report generation from scan results

use crate::crawl::extract_url_path;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use sitescan_scanner::{FailureKind, ScanResult};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use url::Url;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageEntry {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub fetch_ms: u128,
    pub links: Vec<String>,
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureEntry {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub pages: usize,
    pub links: usize,
    pub resources: usize,
    pub failures: usize,
}

/// Flattened, ordered view of a scan used by every report format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportData {
    pub summary: Summary,
    /// Pages grouped by host, each group sorted by URL.
    pub hosts: BTreeMap<String, Vec<PageEntry>>,
    pub failures: Vec<FailureEntry>,
}

pub fn gather_report_data(result: &ScanResult) -> ReportData {
    let mut hosts: BTreeMap<String, Vec<PageEntry>> = BTreeMap::new();

    for page in result.pages.values() {
        let host = page.url.host_str().unwrap_or("unknown").to_string();
        hosts.entry(host).or_default().push(PageEntry {
            url: page.url.to_string(),
            parent: page.parent.as_ref().map(Url::to_string),
            fetch_ms: page.fetch_duration.as_millis(),
            links: page.out_links.iter().map(Url::to_string).collect(),
            resources: page.resources.iter().map(Url::to_string).collect(),
        });
    }
    for entries in hosts.values_mut() {
        entries.sort_by(|a, b| a.url.cmp(&b.url));
    }

    let mut failures: Vec<FailureEntry> = result
        .failures
        .iter()
        .map(|f| FailureEntry {
            url: f.url.to_string(),
            parent: f.parent.as_ref().map(Url::to_string),
            reason: describe_failure(f.kind),
        })
        .collect();
    failures.sort_by(|a, b| a.url.cmp(&b.url));

    let summary = Summary {
        pages: result.len(),
        links: result.pages.values().map(|p| p.out_links.len()).sum(),
        resources: result.pages.values().map(|p| p.resources.len()).sum(),
        failures: failures.len(),
    };

    ReportData {
        summary,
        hosts,
        failures,
    }
}

fn describe_failure(kind: FailureKind) -> String {
    match kind {
        FailureKind::Network => "network error".to_string(),
        FailureKind::Status(code) => format!("HTTP {}", code),
        FailureKind::InvalidUrl => "invalid URL".to_string(),
        FailureKind::Task => "scan task failed".to_string(),
    }
}

pub fn generate_report(result: &ScanResult, format: ReportFormat) -> Result<String, String> {
    let data = gather_report_data(result);
    match format {
        ReportFormat::Text => Ok(generate_text_report(&data)),
        ReportFormat::Json => generate_json_report(&data).map_err(|e| e.to_string()),
        ReportFormat::Markdown => Ok(generate_markdown_report(&data)),
    }
}

pub fn generate_text_report(data: &ReportData) -> String {
    let mut report = String::new();

    report.push_str(RULE);
    report.push_str("\n                          SITESCAN REPORT\n");
    report.push_str(RULE);
    report.push_str("\n\n");

    report.push_str("# Summary:\n");
    report.push_str(&format!("  Pages scanned: {}\n", data.summary.pages));
    report.push_str(&format!("  Total links found: {}\n", data.summary.links));
    report.push_str(&format!("  Total resources found: {}\n", data.summary.resources));
    report.push_str(&format!("  Failed branches: {}\n", data.summary.failures));
    report.push('\n');
    report.push_str(RULE);
    report.push_str("\n\n");

    for (host, pages) in &data.hosts {
        report.push_str(&format!("## {}\n", host.bold()));
        report.push_str(&format!("  {} pages found\n\n", pages.len()));

        for page in pages {
            let path = extract_url_path(&page.url);
            report.push_str(&format!(
                "  {} {}  {} links, {} resources {}\n",
                "✓".green(),
                path,
                page.links.len(),
                page.resources.len(),
                format!("({} ms)", page.fetch_ms).dimmed()
            ));
        }
        report.push('\n');
    }

    if !data.failures.is_empty() {
        report.push_str(&format!("## {}\n", "Failed".red().bold()));
        for failure in &data.failures {
            report.push_str(&format!("  {} {}  {}", "✗".red(), failure.url, failure.reason));
            if let Some(ref parent) = failure.parent {
                report.push_str(&format!("  (linked from {})", extract_url_path(parent)));
            }
            report.push('\n');
        }
        report.push('\n');
    }

    report.push_str(&format!(
        "Generated by Sitescan {} at {}\n",
        env!("CARGO_PKG_VERSION"),
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));

    report
}

pub fn generate_json_report(data: &ReportData) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Sitescan",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "summary": data.summary,
            "hosts": data.hosts,
            "failures": data.failures
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn generate_markdown_report(data: &ReportData) -> String {
    let mut report = String::new();

    report.push_str("# Sitescan Report\n\n");
    report.push_str("| Pages | Links | Resources | Failed |\n");
    report.push_str("|------:|------:|----------:|-------:|\n");
    report.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        data.summary.pages, data.summary.links, data.summary.resources, data.summary.failures
    ));

    for (host, pages) in &data.hosts {
        report.push_str(&format!("## {}\n\n", host));
        report.push_str("| Path | Links | Resources | Fetch (ms) |\n");
        report.push_str("|------|------:|----------:|-----------:|\n");
        for page in pages {
            report.push_str(&format!(
                "| `{}` | {} | {} | {} |\n",
                extract_url_path(&page.url),
                page.links.len(),
                page.resources.len(),
                page.fetch_ms
            ));
        }
        report.push('\n');
    }

    if !data.failures.is_empty() {
        report.push_str("## Failed\n\n");
        for failure in &data.failures {
            report.push_str(&format!("- `{}`: {}\n", failure.url, failure.reason));
        }
        report.push('\n');
    }

    report
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
