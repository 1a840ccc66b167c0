//! Special options catalogue.

use serde::{Deserialize, Serialize};

use site_tracker_core::SpecialOptionId;

use super::UploadedFile;

/// A special option, independent of customers and sites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialOption {
    pub id: SpecialOptionId,
    pub name: String,
    pub details: String,
    #[serde(default)]
    pub files: Vec<UploadedFile>,
}

/// Partial update of a special option. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct SpecialOptionUpdate {
    pub name: Option<String>,
    pub details: Option<String>,
}
