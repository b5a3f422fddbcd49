//! Incremental magic string search over the unexamined tail of a file

use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::path::Path;

use crate::error::ScanError;

/// Result of scanning one file once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    /// New watermark: number of lines examined so far
    pub last_line: usize,

    /// 1-based line numbers of new lines containing the magic text, in order
    pub matches: Vec<usize>,

    /// Previous watermark, if the file shrank below it and was rescanned
    pub truncated_from: Option<usize>,
}

impl ScanOutcome {
    pub fn has_matches(&self) -> bool {
        !self.matches.is_empty()
    }
}

/// Searches files line by line for a literal magic string
#[derive(Debug, Clone)]
pub struct MagicScanner {
    magic: String,
}

impl MagicScanner {
    pub fn new(magic: impl Into<String>) -> Self {
        Self {
            magic: magic.into(),
        }
    }

    pub fn magic(&self) -> &str {
        &self.magic
    }

    /// Scan `path`, skipping lines already covered by `from_line`.
    ///
    /// Lines with a 0-based index below `max(from_line, 1)` are skipped, so the
    /// first line of a file is never reported; after that, scanning resumes
    /// exactly at `from_line` so appended lines are not lost. Every examined
    /// line moves the returned watermark to `index + 1`; if nothing is
    /// examined the watermark is returned unchanged. A file with fewer lines than `from_line` is
    /// treated as truncated and rescanned from the start.
    pub fn scan(&self, path: &Path, from_line: usize) -> Result<ScanOutcome, ScanError> {
        let file = File::open(path).map_err(|source| ScanError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = BufReader::new(file);
        let read_err = |source: std::io::Error| ScanError::Read {
            path: path.to_path_buf(),
            source,
        };

        let (total, matches) = self.scan_lines(&mut reader, from_line).map_err(read_err)?;
        if total >= from_line {
            return Ok(ScanOutcome {
                last_line: watermark(total, from_line),
                matches,
                truncated_from: None,
            });
        }

        reader.rewind().map_err(read_err)?;
        let (total, matches) = self.scan_lines(&mut reader, 0).map_err(read_err)?;
        Ok(ScanOutcome {
            last_line: watermark(total, 0),
            matches,
            truncated_from: Some(from_line),
        })
    }

    /// Read every line, returning the line count and the 1-based numbers of
    /// matching lines past the skipped prefix.
    fn scan_lines<R: BufRead>(
        &self,
        reader: &mut R,
        from_line: usize,
    ) -> std::io::Result<(usize, Vec<usize>)> {
        let skip_below = from_line.max(1);
        let magic = self.magic.as_bytes();
        let mut buf = Vec::new();
        let mut matches = Vec::new();
        let mut index = 0;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            if index >= skip_below && contains_magic(trim_newline(&buf), magic) {
                matches.push(index + 1);
            }
            index += 1;
        }

        Ok((index, matches))
    }
}

fn watermark(total: usize, from_line: usize) -> usize {
    if total > from_line.max(1) {
        total
    } else {
        from_line
    }
}

fn trim_newline(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Literal, case-sensitive substring test
pub fn contains_magic(line: &[u8], magic: &[u8]) -> bool {
    if magic.is_empty() {
        return true;
    }
    line.windows(magic.len()).any(|window| window == magic)
}
