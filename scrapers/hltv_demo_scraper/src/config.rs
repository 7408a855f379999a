use serde::{Deserialize, Serialize};
use std::env;

use crate::types::MatchErrorPolicy;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteConfig {
    pub base_url: String,
    pub results_url_template: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.hltv.org".to_string(),
            results_url_template: "https://www.hltv.org/results?event={}".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DownloadConfig {
    /// Maximum seconds allowed per demo download before it counts as timed out.
    pub timeout_secs: u64,
    /// Seconds between checks for download completion.
    pub poll_interval_secs: u64,
    /// Filename suffix Chrome gives to not-yet-complete downloads.
    pub in_progress_suffix: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 1000,
            poll_interval_secs: 5,
            in_progress_suffix: ".crdownload".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScraperConfig {
    pub site: SiteConfig,
    pub download: DownloadConfig,
    pub match_error_policy: MatchErrorPolicy,
}

impl ScraperConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(base_url) = env::var("HLTV_BASE_URL") {
            config.site.results_url_template = format!("{}/results?event={{}}", base_url);
            config.site.base_url = base_url;
        }
        if let Ok(timeout) = env::var("DOWNLOAD_TIMEOUT_SECS").map_or(Ok(None), |t| t.parse::<u64>().map(Some)) {
            if let Some(timeout) = timeout {
                config.download.timeout_secs = timeout;
            }
        }
        if let Ok(period) = env::var("DOWNLOAD_POLL_SECS").map_or(Ok(None), |p| p.parse::<u64>().map(Some)) {
            if let Some(period) = period {
                config.download.poll_interval_secs = period;
            }
        }
        if let Ok(policy) = env::var("MATCH_ERROR_POLICY") {
            match policy.as_str() {
                "abort" => config.match_error_policy = MatchErrorPolicy::Abort,
                "skip" => config.match_error_policy = MatchErrorPolicy::SkipAndContinue,
                _ => {}
            }
        }

        config
    }

    /// Results-page URL listing every match of an event.
    pub fn results_url(&self, event_id: &str) -> String {
        self.site.results_url_template.replace("{}", event_id)
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            download: DownloadConfig::default(),
            match_error_policy: MatchErrorPolicy::SkipAndContinue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_url() {
        let config = ScraperConfig::default();
        assert_eq!(
            config.results_url("7148"),
            "https://www.hltv.org/results?event=7148"
        );
    }
}
