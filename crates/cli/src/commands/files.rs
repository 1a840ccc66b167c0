//! Attachment commands.

use std::path::Path;

use clap::Args;
use tracing::info;

use site_tracker_core::{CustomerId, FileId, SiteId, SpecialOptionId};

use super::{CommandError, open_tracker};

/// Where an attachment lives: a site, or a special option.
#[derive(Args)]
pub struct Target {
    /// Customer owning the site
    #[arg(long, requires = "site", conflicts_with = "option")]
    pub customer: Option<CustomerId>,

    /// Site holding the file
    #[arg(long, requires = "customer")]
    pub site: Option<SiteId>,

    /// Special option holding the file
    #[arg(long)]
    pub option: Option<SpecialOptionId>,
}

enum Owner {
    Site(CustomerId, SiteId),
    SpecialOption(SpecialOptionId),
}

impl Target {
    fn owner(&self) -> Result<Owner, CommandError> {
        match (self.customer, self.site, self.option) {
            (_, _, Some(option)) => Ok(Owner::SpecialOption(option)),
            (Some(customer), Some(site), None) => Ok(Owner::Site(customer, site)),
            _ => Err(CommandError::MissingTarget),
        }
    }
}

/// Upload a file. The MIME type is guessed from its extension.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the target does not exist.
pub async fn attach(path: &Path, target: &Target) -> Result<(), CommandError> {
    let owner = target.owner()?;
    let data = tokio::fs::read(path)
        .await
        .map_err(|source| CommandError::Read {
            path: path.to_owned(),
            source,
        })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime_type = mime_guess::from_path(path).first_or_octet_stream();

    let (mut tracker, _) = open_tracker()?;
    let file = match owner {
        Owner::Site(customer_id, site_id) => {
            tracker.attach_site_file(customer_id, site_id, &name, mime_type.essence_str(), data)?
        }
        Owner::SpecialOption(option_id) => {
            tracker.attach_option_file(option_id, &name, mime_type.essence_str(), data)?
        }
    };

    info!(id = %file.id, name = %file.name, mime_type = %file.mime_type, "File attached");
    Ok(())
}

/// Detach a file and delete its payload.
///
/// # Errors
///
/// Returns an error if the target or the file does not exist.
pub fn detach(file_id: FileId, target: &Target) -> Result<(), CommandError> {
    let (mut tracker, _) = open_tracker()?;
    match target.owner()? {
        Owner::Site(customer_id, site_id) => {
            tracker.detach_site_file(customer_id, site_id, file_id)?;
        }
        Owner::SpecialOption(option_id) => tracker.detach_option_file(option_id, file_id)?,
    }

    info!(id = %file_id, "File detached");
    Ok(())
}
