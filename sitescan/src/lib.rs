// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{handle_scan, load_seeds, parse_seed_line, read_hosts_file};

// Re-export scan functionality from sitescan-core
pub use sitescan_core::crawl::{
    CrawlOptions, CrawlProgressCallback, FollowMode, execute_crawl, extract_url_path,
};
