//! File attachments on sites and special options.
//!
//! Payloads go to the blob store; only [`UploadedFile`] metadata is kept in
//! the JSON documents.

use site_tracker_core::{CustomerId, FileId, SiteId, SpecialOptionId};

use super::{Tracker, required_name};
use crate::error::TrackerError;
use crate::models::UploadedFile;
use crate::storage::{BlobStore, KeyValueStore};

impl<S: KeyValueStore, B: BlobStore> Tracker<S, B> {
    /// Store a payload and attach it to a site.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::NotFound` for an unknown customer or site,
    /// `TrackerError::EmptyName` for a blank file name, or a storage error.
    pub fn attach_site_file(
        &mut self,
        customer_id: CustomerId,
        site_id: SiteId,
        name: &str,
        mime_type: &str,
        data: Vec<u8>,
    ) -> Result<UploadedFile, TrackerError> {
        let name = required_name("file", name)?;
        // Parent must exist before the blob is written.
        self.site_mut(customer_id, site_id)?;

        let file = self.store_blob(name, mime_type, data)?;
        self.site_mut(customer_id, site_id)?.files.push(file.clone());
        self.persist_customers()?;

        tracing::debug!(%site_id, file_id = %file.id, "File attached to site");
        Ok(file)
    }

    /// Detach a file from a site and delete its payload.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::NotFound` for an unknown customer, site or file.
    pub fn detach_site_file(
        &mut self,
        customer_id: CustomerId,
        site_id: SiteId,
        file_id: FileId,
    ) -> Result<(), TrackerError> {
        let files = &mut self.site_mut(customer_id, site_id)?.files;
        remove_file(files, file_id)?;
        self.persist_customers()?;
        self.blobs_mut().delete(file_id)?;

        Ok(())
    }

    /// Store a payload and attach it to a special option.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::NotFound` for an unknown option,
    /// `TrackerError::EmptyName` for a blank file name, or a storage error.
    pub fn attach_option_file(
        &mut self,
        option_id: SpecialOptionId,
        name: &str,
        mime_type: &str,
        data: Vec<u8>,
    ) -> Result<UploadedFile, TrackerError> {
        let name = required_name("file", name)?;
        self.special_option_mut(option_id)?;

        let file = self.store_blob(name, mime_type, data)?;
        self.special_option_mut(option_id)?.files.push(file.clone());
        self.persist_special_options()?;

        Ok(file)
    }

    /// Detach a file from a special option and delete its payload.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::NotFound` for an unknown option or file.
    pub fn detach_option_file(
        &mut self,
        option_id: SpecialOptionId,
        file_id: FileId,
    ) -> Result<(), TrackerError> {
        let files = &mut self.special_option_mut(option_id)?.files;
        remove_file(files, file_id)?;
        self.persist_special_options()?;
        self.blobs_mut().delete(file_id)?;

        Ok(())
    }

    /// Fetch an attachment payload.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the blob store cannot be read.
    pub fn read_file(&self, file_id: FileId) -> Result<Option<Vec<u8>>, TrackerError> {
        Ok(self.blobs().get(file_id)?)
    }

    fn store_blob(
        &mut self,
        name: String,
        mime_type: &str,
        data: Vec<u8>,
    ) -> Result<UploadedFile, TrackerError> {
        let id = self.blobs_mut().put(data)?;
        let mime_type = match mime_type.trim() {
            "" => "application/octet-stream".to_owned(),
            declared => declared.to_owned(),
        };
        Ok(UploadedFile {
            id,
            name,
            mime_type,
        })
    }
}

fn remove_file(files: &mut Vec<UploadedFile>, file_id: FileId) -> Result<(), TrackerError> {
    let before = files.len();
    files.retain(|f| f.id != file_id);
    if files.len() == before {
        return Err(TrackerError::not_found("file", file_id));
    }
    Ok(())
}
