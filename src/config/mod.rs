use anyhow::{anyhow, bail, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Default extension of watched files
pub const DEFAULT_EXTENSION: &str = "txt";

/// Default delay between two polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Runtime configuration for dirwatcher
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory to watch (not recursive)
    pub directory: PathBuf,

    /// Literal text to look for in new lines
    pub magic: String,

    /// Filename suffix a file must have to be watched (e.g. "txt")
    pub extension: String,

    /// Time to sleep between two polls
    pub poll_interval: Duration,
}

impl Config {
    /// Create a configuration with the default extension and interval
    pub fn new(directory: impl Into<PathBuf>, magic: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            magic: magic.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Set the watched extension
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Set the delay between polls
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Convert a (possibly fractional) number of seconds into a poll interval
    pub fn poll_interval_from_secs(secs: f64) -> Result<Duration> {
        if !secs.is_finite() || secs <= 0.0 {
            bail!("Polling interval must be a positive number of seconds, got {}", secs);
        }
        Duration::try_from_secs_f64(secs)
            .map_err(|err| anyhow!("Polling interval of {} seconds is out of range: {}", secs, err))
    }

    /// Check the configuration before the watcher starts
    pub fn validate(&self) -> Result<()> {
        if self.magic.is_empty() {
            bail!("Magic text must not be empty");
        }
        if self.extension.is_empty() {
            bail!("Extension must not be empty");
        }
        if self.poll_interval.is_zero() {
            bail!("Polling interval must be greater than zero");
        }
        Ok(())
    }
}
