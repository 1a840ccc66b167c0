//! Special option commands.

use tracing::info;

use super::{CommandError, open_tracker};

/// Log every special option.
///
/// # Errors
///
/// Returns an error if the data directory cannot be read.
pub fn list() -> Result<(), CommandError> {
    let (tracker, _) = open_tracker()?;

    for option in tracker.special_options() {
        info!(id = %option.id, files = option.files.len(), "{}: {}", option.name, option.details);
    }
    Ok(())
}

/// Create a special option.
///
/// # Errors
///
/// Returns an error for a blank name or a storage failure.
pub fn create(name: &str, details: &str) -> Result<(), CommandError> {
    let (mut tracker, _) = open_tracker()?;
    let option = tracker.add_special_option(name, details)?;

    info!(id = %option.id, "Special option created");
    Ok(())
}
