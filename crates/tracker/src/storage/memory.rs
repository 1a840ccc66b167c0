//! In-memory storage backends.

use std::collections::HashMap;

use site_tracker_core::FileId;

use super::{BlobStore, KeyValueStore, StorageError};

/// Key-value store backed by a `HashMap`.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    documents: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether nothing has been written yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.documents.get(key).cloned())
    }

    fn save(&mut self, key: &str, document: &str) -> Result<(), StorageError> {
        self.documents.insert(key.to_owned(), document.to_owned());
        Ok(())
    }
}

/// Blob store backed by a `HashMap`.
#[derive(Debug, Default, Clone)]
pub struct MemoryBlobStore {
    blobs: HashMap<FileId, Vec<u8>>,
}

impl MemoryBlobStore {
    /// Create an empty blob store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Whether no blob is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl BlobStore for MemoryBlobStore {
    fn put(&mut self, data: Vec<u8>) -> Result<FileId, StorageError> {
        let id = FileId::generate();
        self.blobs.insert(id, data);
        Ok(id)
    }

    fn get(&self, id: FileId) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.blobs.get(&id).cloned())
    }

    fn delete(&mut self, id: FileId) -> Result<(), StorageError> {
        self.blobs.remove(&id);
        Ok(())
    }
}
