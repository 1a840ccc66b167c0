//! Integration tests for Site Tracker.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p site-tracker-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `import` - CSV import against the file-backed stores
//! - `attachments` - Attachment payloads on disk
//!
//! Every test gets its own [`TestContext`], a tracker over a fresh temporary
//! data directory.

use std::path::{Path, PathBuf};

use site_tracker::storage::{FileBlobStore, FileStore};
use site_tracker::{StorageError, Tracker, TrackerConfig};
use tempfile::TempDir;

/// Tracker backed by a temporary data directory.
pub type FileTracker = Tracker<FileStore, FileBlobStore>;

/// A temporary data directory laid out like the CLI's.
pub struct TestContext {
    dir: TempDir,
    pub config: TrackerConfig,
}

impl TestContext {
    /// Create an empty data directory.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be created.
    pub fn new() -> std::io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let data_dir = dir.path().to_string_lossy().into_owned();
        let config = TrackerConfig::from_lookup(|key| {
            (key == "SITE_TRACKER_DATA_DIR").then(|| data_dir.clone())
        })
        .map_err(std::io::Error::other)?;

        Ok(Self { dir, config })
    }

    /// Open (or reopen) the tracker over the data directory.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the stored documents cannot be read.
    pub fn open(&self) -> Result<FileTracker, StorageError> {
        let store = FileStore::open(self.config.store_dir())?;
        let blobs = FileBlobStore::open(self.config.blob_dir())?;
        Tracker::open(store, blobs)
    }

    /// Root of the data directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of a stored JSON document.
    #[must_use]
    pub fn document(&self, key: &str) -> PathBuf {
        self.config.store_dir().join(format!("{key}.json"))
    }
}
