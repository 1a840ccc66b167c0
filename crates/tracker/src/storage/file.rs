//! Directory-backed storage backends.
//!
//! Documents live in `<dir>/<key>.json`, blobs in `<dir>/<file id>.bin`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use site_tracker_core::FileId;

use super::{BlobStore, KeyValueStore, StorageError};

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn ensure_dir(dir: &Path) -> Result<(), StorageError> {
    fs::create_dir_all(dir).map_err(|e| io_error(dir, e))
}

/// Read a file, mapping "not found" to `None`.
fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, StorageError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(io_error(path, e)),
    }
}

/// Key-value store keeping one pretty-printed JSON file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a document directory.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        ensure_dir(&dir)?;
        Ok(Self { dir })
    }

    /// Directory holding the documents.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn document_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.document_path(key);
        let Some(bytes) = read_optional(&path)? else {
            return Ok(None);
        };

        String::from_utf8(bytes).map(Some).map_err(|e| {
            io_error(
                &path,
                std::io::Error::new(ErrorKind::InvalidData, e.utf8_error()),
            )
        })
    }

    fn save(&mut self, key: &str, document: &str) -> Result<(), StorageError> {
        let path = self.document_path(key);
        let staging = self.dir.join(format!(".{key}.json.tmp"));

        fs::write(&staging, document).map_err(|e| io_error(&staging, e))?;
        fs::rename(&staging, &path).map_err(|e| io_error(&path, e))?;

        tracing::debug!(key, path = %path.display(), "Document saved");
        Ok(())
    }
}

/// Blob store keeping one file per attachment.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    /// Open (and create if needed) a blob directory.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        ensure_dir(&dir)?;
        Ok(Self { dir })
    }

    fn blob_path(&self, id: FileId) -> PathBuf {
        self.dir.join(format!("{id}.bin"))
    }
}

impl BlobStore for FileBlobStore {
    fn put(&mut self, data: Vec<u8>) -> Result<FileId, StorageError> {
        let id = FileId::generate();
        let path = self.blob_path(id);
        fs::write(&path, data).map_err(|e| io_error(&path, e))?;
        Ok(id)
    }

    fn get(&self, id: FileId) -> Result<Option<Vec<u8>>, StorageError> {
        read_optional(&self.blob_path(id))
    }

    fn delete(&mut self, id: FileId) -> Result<(), StorageError> {
        let path = self.blob_path(id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path, e)),
        }
    }
}
