use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Scraped markup does not have the structure we rely on. Raised instead
    /// of guessing when a page is ambiguous or missing expected elements.
    #[error("unrecognized HLTV page format: {0}")]
    MalformedPage(String),

    /// The download watcher was invoked on a directory with no entries.
    /// The watcher must only run once a download has been initiated.
    #[error("no files found in {}", .0.display())]
    EmptyDirectory(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
