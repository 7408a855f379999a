use anyhow::Result;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use hltv_demo_scraper::browser::ChromeSession;
use hltv_demo_scraper::config::ScraperConfig;
use hltv_demo_scraper::demo_downloader::DemoDownloader;
use hltv_demo_scraper::demo_extractor;
use hltv_demo_scraper::download_watcher::DirectoryWatcher;
use hltv_demo_scraper::utils::parse_txt_file_list;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Download demo archives for a subset of maps at a list of HLTV events
    Download {
        /// Path to a .txt file where each line contains an HLTV event id
        #[arg(long)]
        events_path: PathBuf,
        /// Path to a .txt file where each line contains a map name
        #[arg(long)]
        maps_path: PathBuf,
        /// Directory to store demo archives in
        #[arg(long)]
        output_path: PathBuf,
        /// Path to a Chrome binary
        #[arg(long)]
        chrome_bin: PathBuf,
    },
    /// Extract downloaded demo archives and keep only wanted maps
    Extract {
        /// Path to a .txt file where each line contains a map name
        #[arg(long)]
        maps_path: PathBuf,
        /// Directory containing the demo .rar files
        #[arg(long)]
        demorar_path: PathBuf,
        /// Directory to store extracted demos in
        #[arg(long)]
        output_path: PathBuf,
    },
}

async fn run_download(
    config: &ScraperConfig,
    events: &[String],
    maps: &[String],
    output_path: &Path,
    chrome_bin: &Path,
) -> Result<()> {
    let mut session = ChromeSession::launch(chrome_bin, output_path).await?;

    let watcher = DirectoryWatcher::new(
        output_path,
        Duration::from_secs(config.download.timeout_secs),
        Duration::from_secs(config.download.poll_interval_secs),
        &config.download.in_progress_suffix,
    );

    let result = {
        let mut downloader = DemoDownloader::new(&mut session, config, maps, watcher);
        downloader.run(events).await
    };

    // The browser must be released even when the run failed.
    let close_result = session.close().await;
    let outcomes = result?;
    close_result?;

    for (match_url, outcome) in &outcomes {
        println!("{outcome}\t{match_url}");
    }

    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = argfile::expand_args(argfile::parse_fromfile, argfile::PREFIX)?;
    let cli = Cli::parse_from(args);
    let config = ScraperConfig::from_env();

    match cli.command {
        Commands::Download {
            events_path,
            maps_path,
            output_path,
            chrome_bin,
        } => {
            let events = parse_txt_file_list(&events_path)?;
            let maps = parse_txt_file_list(&maps_path)?;
            fs::create_dir_all(&output_path)?;

            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(run_download(&config, &events, &maps, &output_path, &chrome_bin))?;
        }
        Commands::Extract {
            maps_path,
            demorar_path,
            output_path,
        } => {
            let maps = parse_txt_file_list(&maps_path)?;
            fs::create_dir_all(&output_path)?;

            let extracted = demo_extractor::extract_all(&demorar_path, &output_path)?;
            info!("Extracted {extracted} archives");

            let removed = demo_extractor::filter_demos(&output_path, &maps)?;
            info!("Removed {removed} unwanted entries");
        }
    }

    Ok(())
}
