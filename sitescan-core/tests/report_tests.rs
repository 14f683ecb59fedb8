// Tests for report generation functionality

use sitescan_core::report::{
    ReportFormat, gather_report_data, generate_json_report, generate_markdown_report,
    generate_report, generate_text_report, save_report,
};
use sitescan_scanner::{BranchFailure, FailureKind, Page, ScanResult};
use std::time::Duration;
use tempfile::NamedTempFile;
use url::Url;

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

fn sample_result() -> ScanResult {
    let mut result = ScanResult::new();

    let mut root = Page::new(url("http://example.com/"), None);
    root.out_links = vec![url("http://example.com/about"), url("http://example.com/gone")];
    root.resources = vec![url("http://example.com/logo.png")];
    root.fetch_duration = Duration::from_millis(12);
    result.pages.insert(root.url.clone(), root);

    let mut about = Page::new(url("http://example.com/about"), Some(url("http://example.com/")));
    about.fetch_duration = Duration::from_millis(7);
    result.pages.insert(about.url.clone(), about);

    result.failures.push(BranchFailure {
        url: url("http://example.com/gone"),
        parent: Some(url("http://example.com/")),
        kind: FailureKind::Status(404),
        message: "HTTP 404 returned by http://example.com/gone".to_string(),
    });

    result
}

// ============================================================================
// Report Format Tests
// ============================================================================

#[test]
fn test_report_format_from_str() {
    assert_eq!(ReportFormat::from_str("text"), Some(ReportFormat::Text));
    assert_eq!(ReportFormat::from_str("JSON"), Some(ReportFormat::Json));
    assert_eq!(ReportFormat::from_str("markdown"), Some(ReportFormat::Markdown));
    assert_eq!(ReportFormat::from_str("md"), Some(ReportFormat::Markdown));
    assert_eq!(ReportFormat::from_str("csv"), None);
}

// ============================================================================
// Report Data Tests
// ============================================================================

#[test]
fn test_gather_report_data_summary() {
    let data = gather_report_data(&sample_result());

    assert_eq!(data.summary.pages, 2);
    assert_eq!(data.summary.links, 2);
    assert_eq!(data.summary.resources, 1);
    assert_eq!(data.summary.failures, 1);
}

#[test]
fn test_gather_report_data_groups_and_sorts_by_host() {
    let data = gather_report_data(&sample_result());

    let pages = data.hosts.get("example.com").expect("host group");
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].url, "http://example.com/");
    assert_eq!(pages[1].url, "http://example.com/about");
    assert_eq!(pages[1].parent.as_deref(), Some("http://example.com/"));
    assert_eq!(pages[0].fetch_ms, 12);
}

#[test]
fn test_gather_report_data_describes_failures() {
    let data = gather_report_data(&sample_result());
    assert_eq!(data.failures.len(), 1);
    assert_eq!(data.failures[0].reason, "HTTP 404");
}

#[test]
fn test_gather_report_data_empty_result() {
    let data = gather_report_data(&ScanResult::new());
    assert_eq!(data.summary.pages, 0);
    assert!(data.hosts.is_empty());
    assert!(data.failures.is_empty());
}

// ============================================================================
// Rendering Tests
// ============================================================================

#[test]
fn test_text_report_contents() {
    let report = generate_text_report(&gather_report_data(&sample_result()));

    assert!(report.contains("SITESCAN REPORT"));
    assert!(report.contains("Pages scanned: 2"));
    assert!(report.contains("Failed branches: 1"));
    assert!(report.contains("/about"));
    assert!(report.contains("http://example.com/gone"));
    assert!(report.contains("HTTP 404"));
}

#[test]
fn test_json_report_is_valid_json() {
    let json = generate_json_report(&gather_report_data(&sample_result())).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["report"]["metadata"]["generator"], "Sitescan");
    assert_eq!(value["report"]["summary"]["pages"], 2);
    assert_eq!(value["report"]["hosts"]["example.com"].as_array().unwrap().len(), 2);
    assert_eq!(value["report"]["failures"][0]["reason"], "HTTP 404");
}

#[test]
fn test_markdown_report_contents() {
    let report = generate_markdown_report(&gather_report_data(&sample_result()));

    assert!(report.starts_with("# Sitescan Report"));
    assert!(report.contains("| 2 | 2 | 1 | 1 |"));
    assert!(report.contains("## example.com"));
    assert!(report.contains("| `/about` | 0 | 0 | 7 |"));
    assert!(report.contains("- `http://example.com/gone`: HTTP 404"));
}

#[test]
fn test_generate_report_dispatches_on_format() {
    let result = sample_result();
    let json = generate_report(&result, ReportFormat::Json).unwrap();
    assert!(json.trim_start().starts_with('{'));

    let markdown = generate_report(&result, ReportFormat::Markdown).unwrap();
    assert!(markdown.starts_with("# Sitescan Report"));
}

#[test]
fn test_save_report_writes_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp_file = NamedTempFile::new()?;
    save_report("hello report", temp_file.path())?;

    let written = std::fs::read_to_string(temp_file.path())?;
    assert_eq!(written, "hello report");
    Ok(())
}
