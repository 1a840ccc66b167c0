//! CSV import command.

use std::path::Path;

use tracing::info;

use super::{CommandError, open_tracker};

/// Merge the CSV export at `path` into the tracker.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is empty or malformed, or
/// the data directory cannot be written.
pub async fn run(path: &Path) -> Result<(), CommandError> {
    info!(path = %path.display(), "Importing CSV export");

    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CommandError::Read {
            path: path.to_owned(),
            source,
        })?;

    let (mut tracker, config) = open_tracker()?;
    let outcome = tracker.import_csv(&text, &config.import)?;

    info!(
        customers = outcome.customers.len(),
        users = outcome.users.len(),
        orders_created = outcome.stats.orders_created,
        "Tracker now holds"
    );
    Ok(())
}
