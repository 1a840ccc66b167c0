//! Attachment metadata.

use serde::{Deserialize, Serialize};

use site_tracker_core::FileId;

/// Metadata of a file stored in the blob store.
///
/// The payload itself is only reachable through the blob store, using `id`
/// as the handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    /// Blob store handle.
    pub id: FileId,
    /// File name as declared by the uploader.
    pub name: String,
    /// MIME type as declared by the uploader.
    pub mime_type: String,
}
