//! Command implementations.
//!
//! Every command opens the file-backed tracker described by
//! [`TrackerConfig::from_env`], performs one operation and logs the result.
//!
//! # Environment Variables
//!
//! - `SITE_TRACKER_DATA_DIR` - Data directory (default: `./data`)
//! - `SITE_TRACKER_IMPORT_PASSWORD` - Password given to imported users
//! - `SITE_TRACKER_IMPORT_EMAIL_DOMAIN` - Email domain for imported users
//! - `SITE_TRACKER_USER_PASSWORD` - Password for `users create --password`

pub mod customers;
pub mod files;
pub mod import;
pub mod options;
pub mod orders;
pub mod users;

use std::path::PathBuf;

use site_tracker::storage::{FileBlobStore, FileStore};
use site_tracker::{ConfigError, ImportError, StorageError, Tracker, TrackerConfig, TrackerError};
use thiserror::Error;

/// Tracker backed by the data directory.
pub type FileTracker = Tracker<FileStore, FileBlobStore>;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Data directory could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Operation rejected by the tracker.
    #[error("{0}")]
    Tracker(#[from] TrackerError),

    /// Import failed.
    #[error("Import failed: {0}")]
    Import(#[from] ImportError),

    /// Input file could not be read.
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: Admin, Editor, Viewer")]
    InvalidRole(String),

    /// Neither a site nor a special option was given.
    #[error("Specify either --customer and --site, or --option")]
    MissingTarget,
}

/// Open the tracker under the configured data directory.
pub fn open_tracker() -> Result<(FileTracker, TrackerConfig), CommandError> {
    let config = TrackerConfig::from_env()?;
    tracing::debug!(data_dir = %config.data_dir.display(), "Opening tracker");

    let store = FileStore::open(config.store_dir())?;
    let blobs = FileBlobStore::open(config.blob_dir())?;
    let tracker = Tracker::open(store, blobs)?;

    Ok((tracker, config))
}
