//! File-backed log of previously submitted input lines.

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to read history file at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to append to history file at {path}: {source}")]
    Append {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Append-only input history with a recall cursor.
///
/// `cursor == entries.len()` means "not browsing, input is live". The
/// file holds one entry per line and is opened per append, never held
/// across the session.
#[derive(Debug)]
pub struct HistoryLog {
    entries: Vec<String>,
    cursor: usize,
    path: PathBuf,
}

impl HistoryLog {
    /// Loads history from `path`. A missing file yields an empty log.
    pub fn load(path: PathBuf) -> Result<Self, HistoryError> {
        let entries = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|source| HistoryError::Read {
                path: path.clone(),
                source,
            })?;
            content.lines().map(str::to_owned).collect()
        } else {
            Vec::new()
        };

        let cursor = entries.len();
        Ok(Self {
            entries,
            cursor,
            path,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True while the cursor points at a stored entry rather than the
    /// live input.
    pub fn is_browsing(&self) -> bool {
        self.cursor < self.entries.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Records a submitted line. Blank input and an immediate repeat
    /// of the last entry are accepted no-ops. The line is appended to
    /// the file before the call returns; a write failure is propagated
    /// but the in-memory entry is kept.
    pub fn submit(&mut self, text: &str) -> Result<(), HistoryError> {
        if text.trim().is_empty() {
            return Ok(());
        }
        if self.entries.last().is_some_and(|last| last == text) {
            self.cursor = self.entries.len();
            return Ok(());
        }

        self.entries.push(text.to_owned());
        self.cursor = self.entries.len();

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|source| HistoryError::Append {
                path: self.path.clone(),
                source,
            })?;
        writeln!(file, "{text}").map_err(|source| HistoryError::Append {
            path: self.path.clone(),
            source,
        })
    }

    /// Moves the cursor by `direction` (clamped to `[0, len]`) and
    /// returns the text the input should show: the entry at the
    /// cursor, or "" when the cursor is back at the live position.
    pub fn navigate(&mut self, direction: i32) -> &str {
        let next = self
            .cursor
            .saturating_add_signed(direction as isize)
            .min(self.entries.len());
        self.cursor = next;

        if self.cursor == self.entries.len() {
            ""
        } else {
            &self.entries[self.cursor]
        }
    }
}
