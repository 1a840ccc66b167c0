//! Customer and construction-site operations.

use site_tracker_core::{CustomerId, SiteId};

use super::{Tracker, required_name};
use crate::error::TrackerError;
use crate::models::{ConstructionSite, Customer, CustomerUpdate, SiteUpdate};
use crate::storage::{BlobStore, KeyValueStore};

impl<S: KeyValueStore, B: BlobStore> Tracker<S, B> {
    #[must_use]
    pub fn customer(&self, id: CustomerId) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    /// Find a customer by case-insensitive name.
    #[must_use]
    pub fn find_customer_by_name(&self, name: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.has_name(name))
    }

    #[must_use]
    pub fn site(&self, customer_id: CustomerId, site_id: SiteId) -> Option<&ConstructionSite> {
        self.customer(customer_id)?
            .sites
            .iter()
            .find(|s| s.id == site_id)
    }

    /// Create a customer with no sites.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::EmptyName` for a blank name.
    pub fn add_customer(&mut self, name: &str, notes: &str) -> Result<Customer, TrackerError> {
        let customer = Customer {
            id: CustomerId::generate(),
            name: required_name("customer", name)?,
            notes: notes.trim().to_owned(),
            sites: Vec::new(),
        };
        self.customers.push(customer.clone());
        self.persist_customers()?;

        tracing::debug!(customer_id = %customer.id, "Customer created");
        Ok(customer)
    }

    /// Apply a partial update to a customer.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::NotFound` for an unknown customer or
    /// `TrackerError::EmptyName` for a blank name.
    pub fn update_customer(
        &mut self,
        id: CustomerId,
        update: CustomerUpdate,
    ) -> Result<Customer, TrackerError> {
        let name = update
            .name
            .as_deref()
            .map(|name| required_name("customer", name))
            .transpose()?;

        let customer = self.customer_mut(id)?;
        if let Some(name) = name {
            customer.name = name;
        }
        if let Some(notes) = update.notes {
            customer.notes = notes.trim().to_owned();
        }
        let updated = customer.clone();
        self.persist_customers()?;

        Ok(updated)
    }

    /// Remove a customer together with its sites, orders and attachments.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::NotFound` for an unknown customer.
    pub fn delete_customer(&mut self, id: CustomerId) -> Result<(), TrackerError> {
        let customer = self.customer_mut(id)?;
        let file_ids: Vec<_> = customer
            .sites
            .iter()
            .flat_map(|s| s.files.iter().map(|f| f.id))
            .collect();

        self.customers.retain(|c| c.id != id);
        self.persist_customers()?;
        for file_id in file_ids {
            self.blobs_mut().delete(file_id)?;
        }

        tracing::info!(customer_id = %id, "Customer deleted");
        Ok(())
    }

    /// Create a site under a customer.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::NotFound` for an unknown customer or
    /// `TrackerError::EmptyName` for a blank name.
    pub fn add_site(
        &mut self,
        customer_id: CustomerId,
        name: &str,
        general_info: &str,
    ) -> Result<ConstructionSite, TrackerError> {
        let site = ConstructionSite {
            id: SiteId::generate(),
            name: required_name("site", name)?,
            general_info: general_info.trim().to_owned(),
            files: Vec::new(),
            orders: Vec::new(),
        };
        self.customer_mut(customer_id)?.sites.push(site.clone());
        self.persist_customers()?;

        tracing::debug!(%customer_id, site_id = %site.id, "Site created");
        Ok(site)
    }

    /// Apply a partial update to a site.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::NotFound` for an unknown customer or site, or
    /// `TrackerError::EmptyName` for a blank name.
    pub fn update_site(
        &mut self,
        customer_id: CustomerId,
        site_id: SiteId,
        update: SiteUpdate,
    ) -> Result<ConstructionSite, TrackerError> {
        let name = update
            .name
            .as_deref()
            .map(|name| required_name("site", name))
            .transpose()?;

        let site = self.site_mut(customer_id, site_id)?;
        if let Some(name) = name {
            site.name = name;
        }
        if let Some(info) = update.general_info {
            site.general_info = info.trim().to_owned();
        }
        let updated = site.clone();
        self.persist_customers()?;

        Ok(updated)
    }

    /// Remove a site together with its orders and attachments.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::NotFound` for an unknown customer or site.
    pub fn delete_site(
        &mut self,
        customer_id: CustomerId,
        site_id: SiteId,
    ) -> Result<(), TrackerError> {
        let file_ids: Vec<_> = self
            .site_mut(customer_id, site_id)?
            .files
            .iter()
            .map(|f| f.id)
            .collect();

        self.customer_mut(customer_id)?
            .sites
            .retain(|s| s.id != site_id);
        self.persist_customers()?;
        for file_id in file_ids {
            self.blobs_mut().delete(file_id)?;
        }

        tracing::info!(%customer_id, %site_id, "Site deleted");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::{CUSTOMERS_KEY, load_json};
    use crate::tracker::test_support::tracker;

    #[test]
    fn test_add_customer_and_site() {
        let mut tracker = tracker();
        let customer = tracker.add_customer(" Bouygues ", " VIP ").unwrap();
        assert_eq!(customer.name, "Bouygues");
        assert_eq!(customer.notes, "VIP");

        let site = tracker
            .add_site(customer.id, "Tour Triangle", "Porte de Versailles")
            .unwrap();

        let stored: Vec<Customer> = load_json(tracker.store(), CUSTOMERS_KEY).unwrap();
        assert_eq!(stored[0].sites, vec![site]);
        assert!(tracker.find_customer_by_name("bouygues").is_some());
    }

    #[test]
    fn test_add_site_to_unknown_customer() {
        let mut tracker = tracker();
        assert!(matches!(
            tracker.add_site(CustomerId::generate(), "Site", ""),
            Err(TrackerError::NotFound {
                entity: "customer",
                ..
            })
        ));
    }

    #[test]
    fn test_update_customer_and_site() {
        let mut tracker = tracker();
        let customer = tracker.add_customer("Vinci", "").unwrap();
        let site = tracker.add_site(customer.id, "Lyon", "").unwrap();

        let updated = tracker
            .update_customer(
                customer.id,
                CustomerUpdate {
                    notes: Some("Payment at 60 days".to_string()),
                    ..CustomerUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Vinci");
        assert_eq!(updated.notes, "Payment at 60 days");

        let site = tracker
            .update_site(
                customer.id,
                site.id,
                SiteUpdate {
                    name: Some("Lyon Part-Dieu".to_string()),
                    general_info: None,
                },
            )
            .unwrap();
        assert_eq!(tracker.site(customer.id, site.id).unwrap().name, "Lyon Part-Dieu");

        assert!(matches!(
            tracker.update_site(
                customer.id,
                site.id,
                SiteUpdate {
                    name: Some(String::new()),
                    general_info: None,
                },
            ),
            Err(TrackerError::EmptyName("site"))
        ));
    }

    #[test]
    fn test_delete_site_and_customer() {
        let mut tracker = tracker();
        let customer = tracker.add_customer("Vinci", "").unwrap();
        let keep = tracker.add_site(customer.id, "Lyon", "").unwrap();
        let drop = tracker.add_site(customer.id, "Nantes", "").unwrap();

        tracker.delete_site(customer.id, drop.id).unwrap();
        assert!(tracker.site(customer.id, drop.id).is_none());
        assert!(tracker.site(customer.id, keep.id).is_some());
        assert!(matches!(
            tracker.delete_site(customer.id, drop.id),
            Err(TrackerError::NotFound { entity: "site", .. })
        ));

        tracker.delete_customer(customer.id).unwrap();
        assert!(tracker.customers().is_empty());
        let stored: Vec<Customer> = load_json(tracker.store(), CUSTOMERS_KEY).unwrap();
        assert!(stored.is_empty());
    }
}
