use std::fmt;
use tracing::{error, info, warn};

/// Something that happened to a watched file during one poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    FileAdded { name: String },
    FileRemoved { name: String },
    MagicFound { name: String, lines: Vec<usize> },
    FileTruncated { name: String, previous: usize, current: usize },
    ScanFailed { name: String, cause: String },
}

impl WatchEvent {
    /// Log this event at its level
    pub fn emit(&self) {
        match self {
            Self::FileAdded { name } => info!(file = %name, "New file added: {}", name),
            Self::FileRemoved { name } => info!(file = %name, "File deleted: {}", name),
            Self::MagicFound { name, lines } => info!(
                file = %name,
                lines = ?lines,
                "New magic string detected in {}, line numbers: {:?}",
                name,
                lines
            ),
            Self::FileTruncated { name, previous, current } => warn!(
                file = %name,
                previous,
                current,
                "File {} shrank below line {}, rescanning from the start",
                name,
                previous
            ),
            Self::ScanFailed { name, cause } => {
                error!(file = %name, "Failed to scan {}: {}", name, cause)
            }
        }
    }
}

impl fmt::Display for WatchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileAdded { name } => write!(f, "file-added({})", name),
            Self::FileRemoved { name } => write!(f, "file-removed({})", name),
            Self::MagicFound { name, lines } => write!(f, "magic-found({}, {:?})", name, lines),
            Self::FileTruncated { name, previous, current } => {
                write!(f, "file-truncated({}, {} -> {})", name, previous, current)
            }
            Self::ScanFailed { name, cause } => write!(f, "scan-error({}, {})", name, cause),
        }
    }
}
