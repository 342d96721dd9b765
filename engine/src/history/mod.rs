//! Question history and the current-question slot
//!
//! History is a JSON array of `{date, question}` records, most recent first.
//! The log is only ever prepended to. By default storage is unbounded and
//! reads are windowed; setting `storage.max_entries` trims on every write.
//!
//! Both files are replaced atomically: write a temp file in the same
//! directory, fsync it, then rename over the target.

use sdk::errors::EngineError;
use sdk::types::HistoryEntry;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::calendar::RunDate;
use crate::config::Config;

/// Errors raised while persisting history. Reads never fail.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<HistoryError> for EngineError {
    fn from(e: HistoryError) -> Self {
        EngineError::Storage(e.to_string())
    }
}

/// Ordered history, most recent first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog(Vec<HistoryEntry>);

impl HistoryLog {
    pub fn new(entries: Vec<HistoryEntry>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Most recent entry
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.0.first()
    }

    /// True iff the most recent entry was recorded for `date`
    pub fn already_ran_on(&self, date: &RunDate) -> bool {
        self.latest()
            .map(|entry| entry.date == date.canonical())
            .unwrap_or(false)
    }

    /// The `window` most recent question texts, most recent first
    pub fn recent_questions(&self, window: usize) -> Vec<&str> {
        self.0
            .iter()
            .take(window)
            .map(|entry| entry.question.as_str())
            .collect()
    }

    /// Prepend `entry`, then trim to `max_entries` when bounded
    pub fn prepend(&mut self, entry: HistoryEntry, max_entries: Option<usize>) {
        self.0.insert(0, entry);
        if let Some(max) = max_entries {
            self.0.truncate(max);
        }
    }
}

/// File-backed history and current-question storage
#[derive(Debug, Clone)]
pub struct HistoryStore {
    history_path: PathBuf,
    question_path: PathBuf,
    max_entries: Option<usize>,
}

impl HistoryStore {
    pub fn new(
        history_path: impl Into<PathBuf>,
        question_path: impl Into<PathBuf>,
        max_entries: Option<usize>,
    ) -> Self {
        Self {
            history_path: history_path.into(),
            question_path: question_path.into(),
            max_entries,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.history_path(),
            config.question_path(),
            config.storage.max_entries,
        )
    }

    pub fn history_path(&self) -> &Path {
        &self.history_path
    }

    pub fn question_path(&self) -> &Path {
        &self.question_path
    }

    /// Read the persisted history.
    ///
    /// A missing, empty or malformed file yields an empty log.
    pub fn load(&self) -> HistoryLog {
        let contents = match fs::read_to_string(&self.history_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No history file at {:?}, starting fresh", self.history_path);
                return HistoryLog::default();
            }
            Err(e) => {
                tracing::warn!(
                    "Could not read history file {:?}, treating as empty: {}",
                    self.history_path,
                    e
                );
                return HistoryLog::default();
            }
        };

        if contents.trim().is_empty() {
            return HistoryLog::default();
        }

        match serde_json::from_str::<HistoryLog>(&contents) {
            Ok(log) => {
                tracing::debug!("Loaded {} history entries", log.len());
                log
            }
            Err(e) => {
                tracing::warn!(
                    "History file {:?} is malformed, treating as empty: {}",
                    self.history_path,
                    e
                );
                HistoryLog::default()
            }
        }
    }

    /// Prepend `entry`, apply retention, and persist atomically.
    ///
    /// Returns the new log. On error nothing on disk has changed.
    pub fn append(
        &self,
        mut log: HistoryLog,
        entry: HistoryEntry,
    ) -> Result<HistoryLog, HistoryError> {
        log.prepend(entry, self.max_entries);

        let json = serde_json::to_string_pretty(&log)?;
        write_atomic(&self.history_path, json.as_bytes())?;

        tracing::debug!("History now holds {} entries", log.len());
        Ok(log)
    }

    /// Overwrite the current-question slot
    pub fn write_current(&self, question: &str) -> Result<(), HistoryError> {
        write_atomic(&self.question_path, question.as_bytes())
    }
}

/// Write `bytes` to a temp file beside `path`, fsync, then rename over `path`
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), HistoryError> {
    let io_err = |source| HistoryError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
    }

    let tmp_path = temp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(io_err)?;
    let written = tmp_file
        .write_all(bytes)
        .and_then(|_| tmp_file.sync_all());
    drop(tmp_file);

    if let Err(e) = written.and_then(|_| fs::rename(&tmp_path, path)) {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_err(e));
    }

    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "qotd".to_string());
    path.with_file_name(format!(".{}.tmp", file_name))
}
