use serde::{Deserialize, Serialize};
use std::fmt;

/// Everything we need from a single match page: where the demo archive lives
/// and which maps were played. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchInfo {
    pub demo_url: String,
    pub maps: Vec<String>,
}

/// Per-match result of a download run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DownloadOutcome {
    Success { elapsed_secs: f64 },
    SkippedNoOverlap,
    TimedOut,
    Failed { reason: String },
}

impl fmt::Display for DownloadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadOutcome::Success { elapsed_secs } => {
                write!(f, "success ({elapsed_secs:.0}s)")
            }
            DownloadOutcome::SkippedNoOverlap => write!(f, "skipped (no maps overlap)"),
            DownloadOutcome::TimedOut => write!(f, "timed out"),
            DownloadOutcome::Failed { reason } => write!(f, "failed ({reason})"),
        }
    }
}

/// What to do when a single match page cannot be processed.
/// List-page parse failures always abort the run regardless of this setting;
/// without a match list there is nothing left to process for the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchErrorPolicy {
    /// Abort the whole run on the first failing match.
    Abort,
    /// Record the failure as a per-match outcome and move on.
    SkipAndContinue,
}
