pub mod browser;
pub mod config;
pub mod demo_downloader;
pub mod demo_extractor;
pub mod download_watcher;
pub mod error;
pub mod match_page_scraper;
pub mod results_scraper;
pub mod types;
pub mod utils;
