//! Customer and site commands.

use tracing::info;

use site_tracker_core::CustomerId;

use super::{CommandError, open_tracker};

/// Log every customer with its sites.
///
/// # Errors
///
/// Returns an error if the data directory cannot be read.
pub fn list() -> Result<(), CommandError> {
    let (tracker, _) = open_tracker()?;

    for customer in tracker.customers() {
        info!(id = %customer.id, sites = customer.sites.len(), "{}", customer.name);
        for site in &customer.sites {
            info!(
                id = %site.id,
                orders = site.orders.len(),
                files = site.files.len(),
                "  {}",
                site.name
            );
        }
    }
    Ok(())
}

/// Create a customer.
///
/// # Errors
///
/// Returns an error for a blank name or a storage failure.
pub fn create(name: &str, notes: &str) -> Result<(), CommandError> {
    let (mut tracker, _) = open_tracker()?;
    let customer = tracker.add_customer(name, notes)?;

    info!(id = %customer.id, "Customer created");
    Ok(())
}

/// Delete a customer with its sites and attachments.
///
/// # Errors
///
/// Returns an error if the customer does not exist.
pub fn delete(id: CustomerId) -> Result<(), CommandError> {
    let (mut tracker, _) = open_tracker()?;
    tracker.delete_customer(id)?;
    Ok(())
}

/// Create a site under a customer.
///
/// # Errors
///
/// Returns an error for an unknown customer or a blank name.
pub fn create_site(customer_id: CustomerId, name: &str, info: &str) -> Result<(), CommandError> {
    let (mut tracker, _) = open_tracker()?;
    let site = tracker.add_site(customer_id, name, info)?;

    info!(id = %site.id, %customer_id, "Site created");
    Ok(())
}
