//! Append-only error log
//!
//! One line per failed operation:
//! `[YYYY-MM-DD HH:MM:SS] Operation: <label> | Error: <message>`

use std::fmt::Display;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Sidecar file recording operation failures
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends an entry, warning on stderr if the log itself cannot be written
    pub fn record(&self, operation: impl Display, message: &str) {
        if self.try_record(operation, message).is_err() {
            eprintln!("Failed to write to error log.");
        }
    }

    fn try_record(&self, operation: impl Display, message: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open error log: {}", self.path.display()))?;

        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        writeln!(file, "{}", format_entry(timestamp, operation, message))
            .context("Failed to write error log entry")
    }
}

fn format_entry(timestamp: impl Display, operation: impl Display, message: &str) -> String {
    // Keep one entry per line even for multi-line error chains
    let message = message.replace(|c: char| c == '\r' || c == '\n', " ");
    format!("[{}] Operation: {} | Error: {}", timestamp, operation, message)
}
