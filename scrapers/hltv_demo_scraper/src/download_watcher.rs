use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant, SystemTime};

use crate::error::ScrapeError;

/// Result of waiting on a download.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WaitOutcome {
    Completed(Duration),
    TimedOut,
}

/// Something that can tell when the in-flight download has finished.
///
/// The filesystem-polling implementation below is coupled to Chrome's
/// in-progress filename convention; keeping it behind this trait lets a
/// proper download-progress callback replace it without touching the
/// orchestrator.
pub trait CompletionSignal {
    fn await_completion(&self) -> Result<WaitOutcome, ScrapeError>;
}

/// Polls a download directory until the newest entry no longer carries the
/// browser's in-progress suffix. Assumes a single active download; the
/// newest-file heuristic breaks down with concurrent writers.
pub struct DirectoryWatcher {
    dir: PathBuf,
    timeout: Duration,
    poll_interval: Duration,
    in_progress_suffix: String,
}

impl DirectoryWatcher {
    pub fn new(dir: &Path, timeout: Duration, poll_interval: Duration, in_progress_suffix: &str) -> Self {
        Self {
            dir: dir.to_path_buf(),
            timeout,
            poll_interval,
            in_progress_suffix: in_progress_suffix.to_string(),
        }
    }

    /// Name of the most recently modified entry in the watched directory.
    fn newest_entry(&self) -> Result<OsString, ScrapeError> {
        let mut newest: Option<(SystemTime, OsString)> = None;

        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let modified = entry.metadata()?.modified()?;
            if newest.as_ref().map(|(time, _)| modified >= *time).unwrap_or(true) {
                newest = Some((modified, entry.file_name()));
            }
        }

        let (_, name) = newest.ok_or_else(|| ScrapeError::EmptyDirectory(self.dir.clone()))?;
        Ok(name)
    }
}

impl CompletionSignal for DirectoryWatcher {
    /// Blocks the calling thread for up to the configured timeout. Downloads
    /// are strictly one at a time, so occupying the thread is intentional.
    fn await_completion(&self) -> Result<WaitOutcome, ScrapeError> {
        let start = Instant::now();

        while start.elapsed() < self.timeout {
            thread::sleep(self.poll_interval);

            let newest = self.newest_entry()?;
            if !newest.to_string_lossy().ends_with(&self.in_progress_suffix) {
                return Ok(WaitOutcome::Completed(start.elapsed()));
            }
        }

        Ok(WaitOutcome::TimedOut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    const SUFFIX: &str = ".crdownload";

    fn watcher(dir: &Path, timeout_ms: u64) -> DirectoryWatcher {
        DirectoryWatcher::new(
            dir,
            Duration::from_millis(timeout_ms),
            Duration::from_millis(10),
            SUFFIX,
        )
    }

    #[test]
    fn test_empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = watcher(dir.path(), 100).await_completion();
        assert!(matches!(result, Err(ScrapeError::EmptyDirectory(_))));
    }

    #[test]
    fn test_completed_download_is_detected() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("demos.rar")).unwrap();

        let outcome = watcher(dir.path(), 500).await_completion().unwrap();
        match outcome {
            WaitOutcome::Completed(elapsed) => assert!(elapsed < Duration::from_millis(500)),
            WaitOutcome::TimedOut => panic!("expected completion"),
        }
    }

    #[test]
    fn test_in_progress_download_times_out() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("demos.rar.crdownload")).unwrap();

        let outcome = watcher(dir.path(), 100).await_completion().unwrap();
        assert_eq!(outcome, WaitOutcome::TimedOut);
    }

    #[test]
    fn test_newest_entry_governs() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("old-demos.rar")).unwrap();
        thread::sleep(Duration::from_millis(30));
        File::create(dir.path().join("new-demos.rar.crdownload")).unwrap();

        let outcome = watcher(dir.path(), 100).await_completion().unwrap();
        assert_eq!(outcome, WaitOutcome::TimedOut);
    }
}
