use clap::ArgMatches;
use colored::Colorize;
use sitescan_core::crawl::{CrawlOptions, FollowMode, execute_crawl};
use sitescan_core::report::{ReportFormat, generate_report, save_report};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

/// Seed URLs for a scan: the hosts file when one is given, else `--url`.
pub fn load_seeds(url: Option<&Url>, hosts_file: Option<&PathBuf>) -> Result<Vec<String>, String> {
    match (hosts_file, url) {
        (Some(path), _) => {
            let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
            read_hosts_file(Path::new(&expanded))
        }
        (None, Some(url)) => Ok(vec![url.to_string()]),
        (None, None) => Err("Either --url or --hosts-file must be provided".to_string()),
    }
}

/// Seeds listed in a hosts file, in file order, each seed once.
///
/// Lines that are not usable seeds are reported with their line number and
/// skipped; a file with no usable seed is an error.
pub fn read_hosts_file(path: &Path) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Cannot read hosts file {}: {}", path.display(), e))?;

    let mut seeds: Vec<String> = Vec::new();
    for (number, line) in content.lines().enumerate() {
        match parse_seed_line(line) {
            Ok(Some(seed)) if !seeds.contains(&seed) => seeds.push(seed),
            Ok(_) => {}
            Err(reason) => eprintln!(
                "{} {}:{}: {}",
                "!".yellow().bold(),
                path.display(),
                number + 1,
                reason
            ),
        }
    }

    if seeds.is_empty() {
        return Err(format!("No seed URLs in {}", path.display()));
    }
    Ok(seeds)
}

/// One hosts-file line as a normalized seed URL.
///
/// Blank lines and `#` comments give `Ok(None)`. A line that does not parse
/// to a URL with a host (`example.com`, `localhost:8080`) is taken as a bare
/// host and read as `http://<line>`.
pub fn parse_seed_line(line: &str) -> Result<Option<String>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let url = match Url::parse(line) {
        Ok(url) if url.has_host() => url,
        _ => Url::parse(&format!("http://{line}"))
            .map_err(|e| format!("'{}' is neither a URL nor a host: {}", line, e))?,
    };

    match url.scheme() {
        "http" | "https" => Ok(Some(url.to_string())),
        other => Err(format!("'{}' has unsupported scheme {}", line, other)),
    }
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

pub async fn handle_scan(sub_matches: &ArgMatches) {
    let url = sub_matches.get_one::<Url>("url");
    let hosts_file = sub_matches.get_one::<PathBuf>("hosts-file");
    let concurrency = *sub_matches.get_one::<usize>("concurrency").unwrap_or(&4);
    let max_tasks = *sub_matches.get_one::<usize>("max-tasks").unwrap_or(&64);
    let timeout_secs = *sub_matches.get_one::<u64>("timeout").unwrap_or(&10);
    let follow_all = sub_matches.get_flag("follow-all");
    let output = sub_matches.get_one::<String>("output");
    let format = sub_matches
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text);

    let urls = match load_seeds(url, hosts_file) {
        Ok(urls) => urls,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    let follow_mode = if follow_all {
        FollowMode::All
    } else {
        FollowMode::SameHost
    };

    print_divider();
    println!("  Scanning {} host(s)", urls.len());
    println!("  Concurrent fetches: {}", concurrency);
    println!("  Task budget: {}", max_tasks);
    let follow_mode_str = match follow_mode {
        FollowMode::All => "follow all hosts",
        FollowMode::SameHost => "same host only",
    };
    println!("  Scope: {}", follow_mode_str);
    print_divider();

    let options = CrawlOptions {
        urls,
        concurrency,
        max_tasks,
        timeout_secs,
        follow_mode,
        show_progress_bars: true,
    };

    let progress_callback = Arc::new(|msg: String| {
        println!("{}", msg);
    });

    let result = match execute_crawl(options, Some(progress_callback)).await {
        Ok(result) => result,
        Err(e) => {
            eprintln!("{} Scan failed: {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    println!("\n{} Scan complete!\n", "✓".green().bold());

    let report = match generate_report(&result, format) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{} Failed to render report: {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    match output {
        Some(path) => {
            let expanded = shellexpand::tilde(path).to_string();
            let path = Path::new(&expanded);
            if let Err(e) = save_report(&report, path) {
                eprintln!(
                    "{} Failed to write report to {}: {}",
                    "✗".red().bold(),
                    path.display(),
                    e
                );
                std::process::exit(1);
            }
            println!("{} Report saved to {}", "→".blue(), path.display());
        }
        None => print!("{}", report),
    }
}
