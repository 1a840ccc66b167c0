//! The tracker repository.
//!
//! [`Tracker`] owns every in-memory collection and the two persistence
//! collaborators. Operations are grouped by entity in the submodules; each
//! mutating operation writes the affected document back before returning.

mod customers;
mod files;
mod options;
mod orders;
mod users;

use site_tracker_core::{CustomerId, SiteId};

use crate::error::TrackerError;
use crate::models::{ConstructionSite, Customer, SpecialOption, User};
use crate::storage::{
    BlobStore, CUSTOMERS_KEY, KeyValueStore, SPECIAL_OPTIONS_KEY, StorageError, USERS_KEY,
    load_json, save_json,
};

/// Repository over users, customers (with their sites and orders) and
/// special options.
pub struct Tracker<S, B> {
    store: S,
    blobs: B,
    pub(crate) users: Vec<User>,
    pub(crate) customers: Vec<Customer>,
    pub(crate) special_options: Vec<SpecialOption>,
}

impl<S: KeyValueStore, B: BlobStore> Tracker<S, B> {
    /// Load every document from `store`. Missing documents start empty.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if a document cannot be read or decoded.
    pub fn open(store: S, blobs: B) -> Result<Self, StorageError> {
        let users: Vec<User> = load_json(&store, USERS_KEY)?;
        let customers: Vec<Customer> = load_json(&store, CUSTOMERS_KEY)?;
        let special_options: Vec<SpecialOption> = load_json(&store, SPECIAL_OPTIONS_KEY)?;

        tracing::debug!(
            users = users.len(),
            customers = customers.len(),
            special_options = special_options.len(),
            "Tracker opened"
        );

        Ok(Self {
            store,
            blobs,
            users,
            customers,
            special_options,
        })
    }

    /// All users, credentials included. Prefer [`Tracker::list_users`] for
    /// anything leaving the process.
    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// The full customer tree.
    #[must_use]
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    #[must_use]
    pub fn special_options(&self) -> &[SpecialOption] {
        &self.special_options
    }

    /// The document store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The blob store.
    #[must_use]
    pub const fn blobs(&self) -> &B {
        &self.blobs
    }

    /// Give back the persistence collaborators.
    pub fn into_parts(self) -> (S, B) {
        (self.store, self.blobs)
    }

    pub(crate) fn persist_users(&mut self) -> Result<(), StorageError> {
        save_json(&mut self.store, USERS_KEY, &self.users)
    }

    pub(crate) fn persist_customers(&mut self) -> Result<(), StorageError> {
        save_json(&mut self.store, CUSTOMERS_KEY, &self.customers)
    }

    pub(crate) fn persist_special_options(&mut self) -> Result<(), StorageError> {
        save_json(&mut self.store, SPECIAL_OPTIONS_KEY, &self.special_options)
    }

    pub(crate) fn customer_mut(&mut self, id: CustomerId) -> Result<&mut Customer, TrackerError> {
        self.customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| TrackerError::not_found("customer", id))
    }

    pub(crate) fn site_mut(
        &mut self,
        customer_id: CustomerId,
        site_id: SiteId,
    ) -> Result<&mut ConstructionSite, TrackerError> {
        self.customer_mut(customer_id)?
            .sites
            .iter_mut()
            .find(|s| s.id == site_id)
            .ok_or_else(|| TrackerError::not_found("site", site_id))
    }

    pub(crate) fn blobs_mut(&mut self) -> &mut B {
        &mut self.blobs
    }
}

/// Trim a required name, rejecting blanks.
pub(crate) fn required_name(entity: &'static str, name: &str) -> Result<String, TrackerError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TrackerError::EmptyName(entity));
    }
    Ok(name.to_owned())
}
