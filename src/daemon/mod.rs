//! Long-running polling loop around [`FileTracker`]

use anyhow::Result;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn, Level};

use crate::config::Config;
use crate::error::WatchError;
use crate::shutdown::Shutdown;
use crate::watch::{FileTracker, PollReport};

/// What a finished run looked like
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub polls: u64,
    pub failed_polls: u64,
    pub uptime: Duration,
}

/// Poll `config.directory` until `shutdown` is triggered.
///
/// A poll that has started always runs to completion; shutdown is only
/// observed before a poll and during the sleep that follows it.
pub async fn run(config: &Config, shutdown: &Shutdown) -> Result<RunSummary> {
    config.validate()?;

    let started = Instant::now();
    let mut tracker = FileTracker::from_config(config);
    let mut polls = 0u64;
    let mut failed_polls = 0u64;

    info!(
        "Starting to watch directory {} for text of {:?} (extension {:?}, every {:?})",
        tracker.directory().display(),
        tracker.magic(),
        config.extension,
        config.poll_interval
    );

    while !shutdown.is_triggered() {
        polls += 1;
        if let Err(err) = poll_once(&mut tracker) {
            failed_polls += 1;
            log_poll_error(&err);
        }

        tokio::select! {
            _ = tokio::time::sleep(config.poll_interval) => {}
            _ = shutdown.wait() => {
                debug!("Shutdown requested while sleeping");
            }
        }
    }

    let summary = RunSummary {
        polls,
        failed_polls,
        uptime: started.elapsed(),
    };
    info!(
        "Stopped watching {} after {} polls, uptime {:.1}s",
        config.directory.display(),
        summary.polls,
        summary.uptime.as_secs_f64()
    );

    Ok(summary)
}

/// Run a single poll, turning a panic into [`WatchError::Unexpected`]
pub fn poll_once(tracker: &mut FileTracker) -> Result<PollReport, WatchError> {
    match panic::catch_unwind(AssertUnwindSafe(|| tracker.reconcile())) {
        Ok(result) => result,
        Err(payload) => Err(WatchError::Unexpected(panic_message(payload.as_ref()))),
    }
}

fn log_poll_error(err: &WatchError) {
    if err.severity() == Level::WARN {
        warn!("{}", err);
    } else {
        error!("{}", err);
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_stops_when_already_triggered() {
        let dir = TempDir::new().unwrap();
        let config = Config::new(dir.path(), "MAGIC");
        let shutdown = Shutdown::new();
        shutdown.trigger();

        let summary = run(&config, &shutdown).await.unwrap();
        assert_eq!(summary.polls, 0);
    }

    #[tokio::test]
    async fn test_finishes_poll_then_exits() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "x\nMAGIC\n").unwrap();
        let config = Config::new(dir.path(), "MAGIC").with_poll_interval(Duration::from_secs(3600));
        let shutdown = Shutdown::new();

        let trigger = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.trigger();
        });

        let summary = tokio::time::timeout(Duration::from_secs(10), run(&config, &shutdown))
            .await
            .expect("loop ignored shutdown")
            .unwrap();
        assert_eq!(summary.polls, 1);
        assert_eq!(summary.failed_polls, 0);
    }

    #[tokio::test]
    async fn test_keeps_polling_missing_directory() {
        let dir = TempDir::new().unwrap();
        let config = Config::new(dir.path().join("missing"), "MAGIC")
            .with_poll_interval(Duration::from_millis(10));
        let shutdown = Shutdown::new();

        let trigger = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            trigger.trigger();
        });

        let summary = run(&config, &shutdown).await.unwrap();
        assert!(summary.polls >= 2);
        assert_eq!(summary.failed_polls, summary.polls);
    }

    #[tokio::test]
    async fn test_rejects_invalid_config() {
        let shutdown = Shutdown::new();
        let config = Config::new(".", "");
        assert!(run(&config, &shutdown).await.is_err());
    }

    #[test]
    fn test_panic_message() {
        let payload = panic::catch_unwind(|| panic!("scan blew up")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "scan blew up");

        let payload = panic::catch_unwind(|| panic!("{} failed", "listing")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "listing failed");
    }
}
