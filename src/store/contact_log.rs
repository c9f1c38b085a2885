//! Append-only contact log — one JSON object per line.
//!
//! Entries are written once and never read back by the service. The file is
//! opened in append mode for each write; there is no buffering, rotation or
//! size bound.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::AppError;
use super::model::ContactSubmission;

/// Durable sink for accepted contact submissions.
///
/// Called while the store lock is held, so implementations must not block
/// on anything other than their own I/O.
pub trait ContactLog: Send + Sync {
    fn append(&self, contact: &ContactSubmission) -> Result<(), AppError>;
}

/// JSON-lines file on local disk.
pub struct FileContactLog {
    path: PathBuf,
}

impl FileContactLog {
    /// Does not touch the filesystem; the file and its parent directory are
    /// created on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ContactLog for FileContactLog {
    fn append(&self, contact: &ContactSubmission) -> Result<(), AppError> {
        let mut line = serde_json::to_string(contact)
            .map_err(|e| AppError::Store(format!("cannot serialize contact: {e}")))?;
        line.push('\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::Store(format!("cannot create {}: {e}", parent.display()))
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| AppError::Store(format!("cannot open {}: {e}", self.path.display())))?;

        // Single write call so each line lands whole.
        file.write_all(line.as_bytes())
            .map_err(|e| AppError::Store(format!("cannot append to {}: {e}", self.path.display())))?;
        Ok(())
    }
}
