//! Special option operations.

use site_tracker_core::SpecialOptionId;

use super::{Tracker, required_name};
use crate::error::TrackerError;
use crate::models::{SpecialOption, SpecialOptionUpdate};
use crate::storage::{BlobStore, KeyValueStore};

impl<S: KeyValueStore, B: BlobStore> Tracker<S, B> {
    #[must_use]
    pub fn special_option(&self, id: SpecialOptionId) -> Option<&SpecialOption> {
        self.special_options.iter().find(|o| o.id == id)
    }

    /// Create a special option.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::EmptyName` for a blank name.
    pub fn add_special_option(
        &mut self,
        name: &str,
        details: &str,
    ) -> Result<SpecialOption, TrackerError> {
        let option = SpecialOption {
            id: SpecialOptionId::generate(),
            name: required_name("special option", name)?,
            details: details.trim().to_owned(),
            files: Vec::new(),
        };
        self.special_options.push(option.clone());
        self.persist_special_options()?;

        Ok(option)
    }

    /// Apply a partial update to a special option.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::NotFound` for an unknown option or
    /// `TrackerError::EmptyName` for a blank name.
    pub fn update_special_option(
        &mut self,
        id: SpecialOptionId,
        update: SpecialOptionUpdate,
    ) -> Result<SpecialOption, TrackerError> {
        let name = update
            .name
            .as_deref()
            .map(|name| required_name("special option", name))
            .transpose()?;

        let option = self.special_option_mut(id)?;
        if let Some(name) = name {
            option.name = name;
        }
        if let Some(details) = update.details {
            option.details = details.trim().to_owned();
        }
        let updated = option.clone();
        self.persist_special_options()?;

        Ok(updated)
    }

    /// Remove a special option and its attachments.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::NotFound` for an unknown option.
    pub fn delete_special_option(&mut self, id: SpecialOptionId) -> Result<(), TrackerError> {
        let file_ids: Vec<_> = self
            .special_option_mut(id)?
            .files
            .iter()
            .map(|f| f.id)
            .collect();

        self.special_options.retain(|o| o.id != id);
        self.persist_special_options()?;
        for file_id in file_ids {
            self.blobs_mut().delete(file_id)?;
        }

        Ok(())
    }

    pub(crate) fn special_option_mut(
        &mut self,
        id: SpecialOptionId,
    ) -> Result<&mut SpecialOption, TrackerError> {
        self.special_options
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| TrackerError::not_found("special option", id))
    }
}
