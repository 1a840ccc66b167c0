//! Persistence collaborators.
//!
//! The tracker never talks to a storage engine directly. It is handed two
//! collaborators:
//!
//! - a [`KeyValueStore`] holding whole JSON documents under string keys
//!   (`users`, `customers`, `special_options`);
//! - a [`BlobStore`] holding attachment payloads, addressed by [`FileId`].
//!
//! # Backends
//!
//! - [`MemoryStore`] / [`MemoryBlobStore`] - in-process maps, used by tests
//! - [`FileStore`] / [`FileBlobStore`] - one file per key/blob in a directory

mod file;
mod memory;

use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use site_tracker_core::FileId;

pub use file::{FileBlobStore, FileStore};
pub use memory::{MemoryBlobStore, MemoryStore};

/// Document key for the user list.
pub const USERS_KEY: &str = "users";
/// Document key for the customer tree.
pub const CUSTOMERS_KEY: &str = "customers";
/// Document key for the special option list.
pub const SPECIAL_OPTIONS_KEY: &str = "special_options";

/// Errors that can occur while reading or writing persisted data.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path that was being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A stored document could not be (de)serialized.
    #[error("invalid document '{key}': {source}")]
    Json {
        /// Key of the offending document.
        key: String,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

/// Whole-document key-value persistence.
pub trait KeyValueStore {
    /// Load the raw document stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the document stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn save(&mut self, key: &str, document: &str) -> Result<(), StorageError>;
}

/// Opaque binary payload storage for file attachments.
pub trait BlobStore {
    /// Store a payload and return its handle.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn put(&mut self, data: Vec<u8>) -> Result<FileId, StorageError>;

    /// Fetch a payload by handle.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, id: FileId) -> Result<Option<Vec<u8>>, StorageError>;

    /// Remove a payload. Removing an unknown handle is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn delete(&mut self, id: FileId) -> Result<(), StorageError>;
}

/// Load and decode a JSON document, falling back to `T::default()` when the
/// key has never been written.
///
/// # Errors
///
/// Returns `StorageError::Json` if the stored document does not decode.
pub fn load_json<T, S>(store: &S, key: &str) -> Result<T, StorageError>
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.load(key)? else {
        return Ok(T::default());
    };

    serde_json::from_str(&raw).map_err(|source| StorageError::Json {
        key: key.to_owned(),
        source,
    })
}

/// Encode a value as JSON and store it under `key`.
///
/// # Errors
///
/// Returns `StorageError` if encoding or writing fails.
pub fn save_json<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let document = serde_json::to_string_pretty(value).map_err(|source| StorageError::Json {
        key: key.to_owned(),
        source,
    })?;
    store.save(key, &document)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_load_json_defaults_when_missing() {
        let store = MemoryStore::new();
        let value: Vec<String> = load_json(&store, "missing").unwrap();
        assert!(value.is_empty());
    }

    #[test]
    fn test_save_then_load_json() {
        let mut store = MemoryStore::new();
        save_json(&mut store, "names", &vec!["a", "b"]).unwrap();
        let value: Vec<String> = load_json(&store, "names").unwrap();
        assert_eq!(value, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_load_json_reports_corrupt_document() {
        let mut store = MemoryStore::new();
        store.save("users", "{not json").unwrap();
        let err = load_json::<Vec<String>, _>(&store, "users").unwrap_err();
        assert!(matches!(err, StorageError::Json { ref key, .. } if key == "users"));
    }
}
