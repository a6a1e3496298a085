//! File-based data source.
//!
//! Reads a JSON dataset document from disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, warn};

use super::{DataSource, DatasetDocument};

/// A data source that reads a dataset document from a JSON file.
///
/// The source tracks the file's modification time and only returns
/// new data when the file has been updated since the last read.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_modified: None,
        }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn get_modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    /// Read and parse the file.
    fn read_file(&mut self) -> Option<DatasetDocument> {
        match fs::read_to_string(&self.path) {
            Ok(content) => match DatasetDocument::from_json(&content) {
                Ok(document) => {
                    self.last_error = None;
                    debug!(path = %self.path.display(), rows = document.rows.len(), "dataset read");
                    Some(document)
                }
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "dataset parse failed");
                    self.last_error = Some(format!("Parse error: {}", e));
                    None
                }
            },
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "dataset read failed");
                self.last_error = Some(format!("Read error: {}", e));
                None
            }
        }
    }
}

impl DataSource for FileSource {
    fn poll(&mut self) -> Option<DatasetDocument> {
        let current_modified = self.get_modified_time();

        let file_changed = match (&self.last_modified, &current_modified) {
            (None, _) => true,        // Never read successfully, always try
            (Some(_), None) => false, // File disappeared, keep what we have
            (Some(last), Some(current)) => current > last,
        };

        if file_changed {
            if let Some(document) = self.read_file() {
                self.last_modified = current_modified;
                return Some(document);
            }
        }

        None
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
