//! Error types for dirwatcher

use std::path::PathBuf;
use thiserror::Error;
use tracing::Level;

/// Failure of a whole poll of the watched directory
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Directory {} does not exist", path.display())]
    DirectoryUnavailable { path: PathBuf },

    #[error("Failed to list directory {}: {source}", path.display())]
    Listing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unexpected failure during poll: {0}")]
    Unexpected(String),
}

impl WatchError {
    /// Whether this is the expected "nothing to watch yet" condition
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::DirectoryUnavailable { .. })
    }

    /// Level the polling loop logs this error at
    pub fn severity(&self) -> Level {
        if self.is_recoverable() {
            Level::WARN
        } else {
            Level::ERROR
        }
    }
}

/// Failure to scan a single tracked file
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for a single poll
pub type Result<T> = std::result::Result<T, WatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_unavailable_is_warning() {
        let err = WatchError::DirectoryUnavailable {
            path: PathBuf::from("/no/such/dir"),
        };
        assert!(err.is_recoverable());
        assert_eq!(err.severity(), Level::WARN);
        assert_eq!(err.to_string(), "Directory /no/such/dir does not exist");
    }

    #[test]
    fn test_other_errors_are_errors() {
        let listing = WatchError::Listing {
            path: PathBuf::from("logs"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(!listing.is_recoverable());
        assert_eq!(listing.severity(), Level::ERROR);

        let unexpected = WatchError::Unexpected("boom".to_string());
        assert_eq!(unexpected.severity(), Level::ERROR);
        assert!(unexpected.to_string().contains("boom"));
    }

    #[test]
    fn test_scan_error_display() {
        let err = ScanError::Open {
            path: PathBuf::from("logs/a.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.to_string(), "Failed to open logs/a.txt: gone");
    }
}
