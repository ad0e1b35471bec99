use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::client::StatsFetchError;
use crate::config::{self, schema::LoggingConfig};

// ---------------------------------------------------------------------------
// Refresh log entry (JSONL)
// ---------------------------------------------------------------------------

/// A single entry in the refresh journal (`~/.loandash/refresh-log.jsonl`).
///
/// One line per refresh cycle, successful or not. Read back by
/// `loandash history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshLogEntry {
    pub timestamp: String,
    /// Encoded filter query sent with the request (empty when unfiltered).
    pub query: String,
    /// `"rendered"` or `"failed"`.
    pub outcome: String,
    /// HTTP status of a failed request, when the server answered.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
    pub latency_ms: u64,
    /// Number of top-10 rows received (only set for rendered cycles).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub records: Option<usize>,
}

impl RefreshLogEntry {
    pub fn rendered(query: &str, latency_ms: u64, records: usize) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            query: query.to_string(),
            outcome: "rendered".to_string(),
            status: None,
            error: None,
            latency_ms,
            records: Some(records),
        }
    }

    pub fn failed(query: &str, latency_ms: u64, error: &StatsFetchError) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            query: query.to_string(),
            outcome: "failed".to_string(),
            status: error.status(),
            error: Some(error.to_string()),
            latency_ms,
            records: None,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.outcome == "failed"
    }
}

// ---------------------------------------------------------------------------
// Journal
// ---------------------------------------------------------------------------

/// Append-only JSONL journal. A journal without a path drops every entry.
#[derive(Debug, Clone, Default)]
pub struct RefreshJournal {
    path: Option<PathBuf>,
}

impl RefreshJournal {
    /// Build the journal described by `[logging]`.
    pub fn from_config(config: &LoggingConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        Self {
            path: config::expand_home(&config.path),
        }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append an entry. I/O errors are reported on stderr and otherwise
    /// ignored; journaling never fails a refresh cycle.
    pub fn record(&self, entry: &RefreshLogEntry) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(e) = append_entry(path, entry) {
            eprintln!("[loandash] could not write refresh log {}: {e}", path.display());
        }
    }

    /// Read all entries, oldest first.
    ///
    /// Silently skips malformed lines. Returns an empty vec if the file does
    /// not exist or cannot be read.
    pub fn read_all(&self) -> Vec<RefreshLogEntry> {
        let Some(path) = &self.path else {
            return Vec::new();
        };

        let Ok(file) = fs::File::open(path) else {
            return Vec::new();
        };

        BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter_map(|line| serde_json::from_str::<RefreshLogEntry>(&line).ok())
            .collect()
    }

    /// The latest `limit` entries, oldest first.
    pub fn read_recent(&self, limit: usize) -> Vec<RefreshLogEntry> {
        let mut entries = self.read_all();
        let skip = entries.len().saturating_sub(limit);
        entries.drain(..skip);
        entries
    }
}

fn append_entry(path: &Path, entry: &RefreshLogEntry) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(entry)?;
    writeln!(file, "{json}")?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let journal = RefreshJournal::at(dir.path().join("nested").join("log.jsonl"));

        journal.record(&RefreshLogEntry::rendered("", 12, 10));
        journal.record(&RefreshLogEntry::failed(
            "Sesso=M",
            30,
            &StatsFetchError::HttpError {
                status: 500,
                message: "boom".to_string(),
            },
        ));

        let entries = journal.read_all();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].records, Some(10));
        assert!(!entries[0].is_failure());
        assert!(entries[1].is_failure());
        assert_eq!(entries[1].status, Some(500));
        assert_eq!(entries[1].error.as_deref(), Some("boom"));
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.jsonl");
        let journal = RefreshJournal::at(&path);
        journal.record(&RefreshLogEntry::rendered("", 1, 0));
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "not json").unwrap();
        journal.record(&RefreshLogEntry::rendered("A=1", 2, 3));

        let entries = journal.read_all();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].query, "A=1");
    }

    #[test]
    fn read_recent_keeps_latest() {
        let dir = tempfile::tempdir().unwrap();
        let journal = RefreshJournal::at(dir.path().join("log.jsonl"));
        for i in 0..5 {
            journal.record(&RefreshLogEntry::rendered(&format!("n={i}"), i, 0));
        }
        let recent = journal.read_recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].query, "n=3");
        assert_eq!(recent[1].query, "n=4");
    }

    #[test]
    fn disabled_journal_drops_entries() {
        let journal = RefreshJournal::disabled();
        journal.record(&RefreshLogEntry::rendered("", 1, 0));
        assert!(journal.read_all().is_empty());
        assert!(journal.path().is_none());

        let config = LoggingConfig {
            enabled: false,
            ..LoggingConfig::default()
        };
        assert!(RefreshJournal::from_config(&config).path().is_none());
    }
}
