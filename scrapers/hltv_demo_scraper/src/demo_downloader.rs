use anyhow::{Context, Result};
use std::collections::HashSet;
use tracing::{error, info};

use crate::browser::PageSession;
use crate::config::ScraperConfig;
use crate::download_watcher::{CompletionSignal, WaitOutcome};
use crate::match_page_scraper::parse_match_page;
use crate::results_scraper::parse_match_list;
use crate::types::{DownloadOutcome, MatchErrorPolicy};
use crate::utils::pathify;

/// Drives the whole download run: list matches per event, parse each match
/// page, skip matches whose maps do not overlap the wanted set, and wait for
/// each triggered download to finish before moving on. Strictly sequential;
/// the completion heuristic assumes a single in-flight download.
pub struct DemoDownloader<'a, S, C>
where
    S: PageSession,
    C: CompletionSignal,
{
    session: &'a mut S,
    config: &'a ScraperConfig,
    wanted_maps: HashSet<String>,
    completion: C,
}

impl<'a, S, C> DemoDownloader<'a, S, C>
where
    S: PageSession,
    C: CompletionSignal,
{
    pub fn new(session: &'a mut S, config: &'a ScraperConfig, maps: &[String], completion: C) -> Self {
        let wanted_maps = maps.iter().map(|m| pathify(m)).collect();
        Self {
            session,
            config,
            wanted_maps,
            completion,
        }
    }

    /// Process every match of every event in document order and return one
    /// outcome per match. An unparseable results page aborts the run; what
    /// happens on a failing match page is governed by the configured
    /// [`MatchErrorPolicy`].
    pub async fn run(&mut self, event_ids: &[String]) -> Result<Vec<(String, DownloadOutcome)>> {
        let mut outcomes = Vec::new();

        for event_id in event_ids {
            info!("Retrieving match list for event {event_id}");
            let html = self.session.page_source(&self.config.results_url(event_id)).await?;
            let match_urls = parse_match_list(&html, &self.config.site.base_url)
                .with_context(|| format!("unable to parse results page for event {event_id}"))?;

            info!("Downloading demos for {} matches of event {event_id}", match_urls.len());

            for match_url in match_urls {
                let outcome = match self.process_match(&match_url).await {
                    Ok(outcome) => outcome,
                    Err(e) => match self.config.match_error_policy {
                        MatchErrorPolicy::Abort => {
                            return Err(e.context(format!("while processing {match_url}")));
                        }
                        MatchErrorPolicy::SkipAndContinue => {
                            error!("Failed to process {match_url}: {e:#}");
                            DownloadOutcome::Failed {
                                reason: format!("{e:#}"),
                            }
                        }
                    },
                };
                outcomes.push((match_url, outcome));
            }
        }

        Ok(outcomes)
    }

    async fn process_match(&mut self, match_url: &str) -> Result<DownloadOutcome> {
        let html = self.session.page_source(match_url).await?;
        let info = parse_match_page(&html, &self.config.site.base_url)?;

        let overlaps = info
            .maps
            .iter()
            .any(|map| self.wanted_maps.contains(&pathify(map)));
        if !overlaps {
            info!("Skipping {match_url} because no maps overlap");
            return Ok(DownloadOutcome::SkippedNoOverlap);
        }

        self.session.trigger_download(&info.demo_url).await?;
        info!("Waiting for download {match_url} @ {}", info.demo_url);

        match self.completion.await_completion()? {
            WaitOutcome::Completed(elapsed) => {
                info!("Download completed for {match_url}");
                Ok(DownloadOutcome::Success {
                    elapsed_secs: elapsed.as_secs_f64(),
                })
            }
            WaitOutcome::TimedOut => {
                error!("Download for {match_url} reached timeout");
                Ok(DownloadOutcome::TimedOut)
            }
        }
    }
}
