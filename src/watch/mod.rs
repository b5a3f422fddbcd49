//! Directory reconciliation: keeps the watch table in step with the
//! directory listing and scans every tracked file once per poll.

mod event;
mod table;

pub use event::WatchEvent;
pub use table::WatchTable;

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Result, ScanError, WatchError};
use crate::scan::{MagicScanner, ScanOutcome};

/// Everything that happened during one poll
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PollReport {
    /// Events in the order they were emitted
    pub events: Vec<WatchEvent>,

    /// Number of files scanned successfully
    pub files_scanned: usize,
}

impl PollReport {
    fn record(&mut self, event: WatchEvent) {
        event.emit();
        self.events.push(event);
    }

    /// Magic hits of this poll as (filename, line numbers)
    pub fn magic_hits(&self) -> Vec<(&str, &[usize])> {
        self.events
            .iter()
            .filter_map(|event| match event {
                WatchEvent::MagicFound { name, lines } => Some((name.as_str(), lines.as_slice())),
                _ => None,
            })
            .collect()
    }

    pub fn is_quiet(&self) -> bool {
        self.events.is_empty()
    }
}

/// Tracks the files of one directory between polls
pub struct FileTracker {
    directory: PathBuf,
    extension: String,
    scanner: MagicScanner,
    table: WatchTable,
}

impl FileTracker {
    pub fn new(
        directory: impl Into<PathBuf>,
        extension: impl Into<String>,
        magic: impl Into<String>,
    ) -> Self {
        Self {
            directory: directory.into(),
            extension: extension.into(),
            scanner: MagicScanner::new(magic),
            table: WatchTable::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.directory, &config.extension, &config.magic)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn magic(&self) -> &str {
        self.scanner.magic()
    }

    pub fn table(&self) -> &WatchTable {
        &self.table
    }

    /// Run one poll: drop vanished files, pick up new ones, scan all of them.
    ///
    /// Leaves the table untouched if the directory is missing.
    pub fn reconcile(&mut self) -> Result<PollReport> {
        if !self.directory.is_dir() {
            return Err(WatchError::DirectoryUnavailable {
                path: self.directory.clone(),
            });
        }

        let listing = list_qualifying(&self.directory, &self.extension)?;
        Ok(self.apply_listing(&listing))
    }

    /// Reconcile the table against an already taken listing and scan its files
    fn apply_listing(&mut self, listing: &BTreeSet<String>) -> PollReport {
        let mut report = PollReport::default();

        // Removals first so a recreated file starts again from line 0
        for name in self.table.names() {
            if !listing.contains(&name) {
                self.table.remove(&name);
                report.record(WatchEvent::FileRemoved { name });
            }
        }

        for name in listing {
            if self.table.insert_new(name) {
                report.record(WatchEvent::FileAdded { name: name.clone() });
            }
            let from_line = self.table.get(name).unwrap_or(0);
            let result = self.scanner.scan(&self.directory.join(name), from_line);
            self.apply_scan(name, result, &mut report);
        }

        debug!(
            "Poll of {} done: {} tracked, {} scanned, {} events",
            self.directory.display(),
            self.table.len(),
            report.files_scanned,
            report.events.len()
        );

        report
    }

    fn apply_scan(
        &mut self,
        name: &str,
        result: std::result::Result<ScanOutcome, ScanError>,
        report: &mut PollReport,
    ) {
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(err) => {
                report.record(WatchEvent::ScanFailed {
                    name: name.to_string(),
                    cause: err.to_string(),
                });
                return;
            }
        };

        if let Some(previous) = outcome.truncated_from {
            report.record(WatchEvent::FileTruncated {
                name: name.to_string(),
                previous,
                current: outcome.last_line,
            });
        }
        if outcome.has_matches() {
            report.record(WatchEvent::MagicFound {
                name: name.to_string(),
                lines: outcome.matches,
            });
        }
        self.table.advance(name, outcome.last_line);
        report.files_scanned += 1;
    }
}

/// Names of the regular files in `dir` ending with `extension`
pub fn list_qualifying(dir: &Path, extension: &str) -> Result<BTreeSet<String>> {
    let entries = fs::read_dir(dir).map_err(|source| WatchError::Listing {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut names = BTreeSet::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Error listing {}: {}", dir.display(), err);
                continue;
            }
        };

        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            debug!("Skipping non UTF-8 filename: {:?}", entry.file_name());
            continue;
        };
        if !name.ends_with(extension) || !entry.path().is_file() {
            continue;
        }
        names.insert(name);
    }

    Ok(names)
}
