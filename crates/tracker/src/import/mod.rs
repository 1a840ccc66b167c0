//! CSV import and merge.
//!
//! [`Tracker::import_csv`] turns a spreadsheet export into customers, sites,
//! orders and users. Every row is an idempotent upsert keyed on
//! case-insensitive names: existing entities are reused, empty text fields are
//! backfilled but never overwritten, and an order whose part number already
//! exists on the site is left alone. Importing the same file twice changes
//! nothing the second time.
//!
//! Rows that cannot produce an entity are skipped silently and only counted
//! in [`ImportStats`]; unreadable dates fall back to the current time with a
//! warning. Only an empty or undecodable file fails the whole import. If a
//! row fails mid-import, the rows merged before it are still saved.

pub mod date;
pub mod table;

use chrono::{DateTime, Utc};
use thiserror::Error;

use site_tracker_core::{CustomerId, Email, OrderId, PartType, Role, SiteId, UserId};

use crate::auth::hash_password;
use crate::config::ImportConfig;
use crate::error::TrackerError;
use crate::models::{ConstructionSite, Customer, Order, OrderPart, PublicUser, User};
use crate::storage::{BlobStore, KeyValueStore, StorageError};
use crate::tracker::Tracker;

pub use date::parse_order_date;
pub use table::{ImportRecord, parse_records};

/// `OrderStatus` value marking an order as sent.
pub const SENT_STATUS: &str = "Envoyée";

/// Errors that abort an import before any row is merged, or while saving.
#[derive(Debug, Error)]
pub enum ImportError {
    /// No header row, or a header row with no data underneath.
    #[error("import file is empty")]
    EmptyFile,

    /// The CSV reader could not decode the input.
    #[error("malformed CSV: {0}")]
    Malformed(#[from] csv::Error),

    #[error(transparent)]
    Tracker(#[from] TrackerError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// What an import did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    /// Data rows read from the file.
    pub rows: usize,
    /// Rows ignored because `CustomerName` was empty.
    pub skipped_rows: usize,
    pub customers_created: usize,
    pub sites_created: usize,
    pub users_created: usize,
    pub orders_created: usize,
    /// Orders not created because the site already had that part number.
    pub duplicate_orders: usize,
}

/// Result of [`Tracker::import_csv`].
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// The full customer tree after the merge.
    pub customers: Vec<Customer>,
    /// Every user after the merge, credentials stripped.
    pub users: Vec<PublicUser>,
    pub stats: ImportStats,
}

impl<S: KeyValueStore, B: BlobStore> Tracker<S, B> {
    /// Merge a CSV export into the tracker and persist the result.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::EmptyFile` or `ImportError::Malformed` if the
    /// text cannot be read (nothing is merged in that case), and a storage
    /// or hashing error if saving or creating a user fails.
    #[tracing::instrument(skip_all, fields(bytes = text.len()))]
    pub fn import_csv(
        &mut self,
        text: &str,
        config: &ImportConfig,
    ) -> Result<ImportOutcome, ImportError> {
        let records = parse_records(text)?;
        let mut stats = ImportStats {
            rows: records.len(),
            ..ImportStats::default()
        };

        let merged = records
            .iter()
            .try_for_each(|record| self.merge_record(record, config, &mut stats));
        self.persist_import(merged)?;

        tracing::info!(
            rows = stats.rows,
            skipped = stats.skipped_rows,
            customers = stats.customers_created,
            sites = stats.sites_created,
            users = stats.users_created,
            orders = stats.orders_created,
            duplicates = stats.duplicate_orders,
            "Import finished"
        );

        Ok(ImportOutcome {
            customers: self.customers.clone(),
            users: self.list_users(),
            stats,
        })
    }

    /// Save both documents, whether or not every row merged.
    ///
    /// Rows merged before a failure stay in memory, so they are written out
    /// before the merge error is returned.
    fn persist_import(&mut self, merged: Result<(), ImportError>) -> Result<(), ImportError> {
        let saved = self
            .persist_customers()
            .and_then(|()| self.persist_users());

        if let Err(e) = &merged {
            tracing::warn!(error = %e, "Import stopped, keeping rows merged so far");
        }

        merged?;
        Ok(saved?)
    }

    fn merge_record(
        &mut self,
        record: &ImportRecord,
        config: &ImportConfig,
        stats: &mut ImportStats,
    ) -> Result<(), ImportError> {
        if record.customer_name.is_empty() {
            stats.skipped_rows += 1;
            return Ok(());
        }

        let assignee = if record.order_assigned_user.is_empty() {
            None
        } else {
            self.resolve_import_user(record, config, stats)?
        };

        let (customer, created) = find_or_insert(
            &mut self.customers,
            |c| c.has_name(&record.customer_name),
            || Customer {
                id: CustomerId::generate(),
                name: record.customer_name.clone(),
                notes: record.customer_notes.clone(),
                sites: Vec::new(),
            },
        );
        if created {
            stats.customers_created += 1;
        } else {
            backfill(&mut customer.notes, &record.customer_notes);
        }

        if record.site_name.is_empty() {
            return Ok(());
        }

        let (site, created) = find_or_insert(
            &mut customer.sites,
            |s| s.has_name(&record.site_name),
            || ConstructionSite {
                id: SiteId::generate(),
                name: record.site_name.clone(),
                general_info: record.site_general_info.clone(),
                files: Vec::new(),
                orders: Vec::new(),
            },
        );
        if created {
            stats.sites_created += 1;
        } else {
            backfill(&mut site.general_info, &record.site_general_info);
        }

        let Some((user_id, user_name)) = assignee else {
            return Ok(());
        };
        if record.order_number.is_empty() {
            return Ok(());
        }
        let Some(part_type) = PartType::from_import_label(&record.order_part) else {
            return Ok(());
        };
        if site.has_part(part_type, &record.order_number) {
            stats.duplicate_orders += 1;
            return Ok(());
        }

        site.orders.push(Order {
            id: OrderId::generate(),
            part_type,
            part: OrderPart {
                number: record.order_number.clone(),
                is_sent: record.order_status == SENT_STATUS,
                created_at: creation_date(record),
                user_id,
                user_name,
                notes: Some(record.order_notes.clone()).filter(|n| !n.is_empty()),
            },
        });
        stats.orders_created += 1;

        Ok(())
    }

    /// The user named in `OrderAssignedUser`, created on first sight.
    ///
    /// Returns `None` if no usable email can be derived from the name.
    fn resolve_import_user(
        &mut self,
        record: &ImportRecord,
        config: &ImportConfig,
        stats: &mut ImportStats,
    ) -> Result<Option<(UserId, String)>, TrackerError> {
        let name = &record.order_assigned_user;
        if let Some(user) = self.find_user_by_name(name) {
            return Ok(Some((user.id, user.name.clone())));
        }

        let email = match Email::parse(&self.free_import_email(name, &config.email_domain)) {
            Ok(email) => email,
            Err(e) => {
                tracing::warn!(
                    line = record.line,
                    user = %name,
                    error = %e,
                    "Cannot derive an email for imported user"
                );
                return Ok(None);
            }
        };

        let user = User {
            id: UserId::generate(),
            name: name.clone(),
            email,
            role: Role::normalize(&record.user_role),
            password_hash: Some(hash_password(&config.placeholder_password)?),
        };
        let resolved = (user.id, user.name.clone());
        tracing::debug!(user_id = %user.id, role = %user.role, "User created by import");
        self.users.push(user);
        stats.users_created += 1;

        Ok(Some(resolved))
    }

    /// `first.last@domain`, or `first.last.2@domain`... whichever is free.
    fn free_import_email(&self, name: &str, domain: &str) -> String {
        let local = email_local_part(name);
        let mut candidate = format!("{local}@{domain}");
        let mut n = 2;
        while self.find_user_by_email(&candidate).is_some() {
            candidate = format!("{local}.{n}@{domain}");
            n += 1;
        }
        candidate
    }
}

/// Lower-cased name with whitespace runs joined by dots.
fn email_local_part(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(".")
}

fn creation_date(record: &ImportRecord) -> DateTime<Utc> {
    let raw = &record.order_creation_date;
    parse_order_date(raw).unwrap_or_else(|| {
        if !raw.is_empty() {
            tracing::warn!(
                line = record.line,
                value = %raw,
                "Unreadable OrderCreationDate, using now"
            );
        }
        Utc::now()
    })
}

fn backfill(field: &mut String, imported: &str) {
    if field.is_empty() && !imported.is_empty() {
        imported.clone_into(field);
    }
}

/// Return the first item matching `matches`, pushing `create()` if none does.
/// The flag is `true` when the item was created.
#[allow(clippy::indexing_slicing)] // index comes from the same vector
fn find_or_insert<T>(
    items: &mut Vec<T>,
    matches: impl Fn(&T) -> bool,
    create: impl FnOnce() -> T,
) -> (&mut T, bool) {
    let (index, created) = match items.iter().position(matches) {
        Some(index) => (index, false),
        None => {
            items.push(create());
            (items.len() - 1, true)
        }
    };
    (&mut items[index], created)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::models::NewUser;
    use crate::storage::{CUSTOMERS_KEY, USERS_KEY, load_json};
    use crate::tracker::test_support::tracker;

    const HEADER: &str = "CustomerName,CustomerNotes,SiteName,SiteGeneralInfo,OrderPart,\
OrderNumber,OrderStatus,OrderCreationDate,OrderAssignedUser,OrderNotes,UserRole";

    fn csv(rows: &[&str]) -> String {
        let mut text = HEADER.to_owned();
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text
    }

    #[test]
    fn test_import_builds_tree() {
        let mut tracker = tracker();
        let text = csv(&[
            "Vinci,Client historique,Lyon,Bâtiment A,Huisseries,F-001,Envoyée,\"23/10/2025, 14:30:00\",Jean Dupont,Urgent,Editor",
            "vinci,,Lyon,,Portes,P-001,En attente,23/10/2025,Jean Dupont,,",
            "VINCI,,Nantes,,Portes,P-001,,,jean dupont,,",
        ]);

        let outcome = tracker.import_csv(&text, &ImportConfig::default()).unwrap();

        assert_eq!(outcome.customers.len(), 1);
        let customer = &outcome.customers[0];
        assert_eq!(customer.name, "Vinci");
        assert_eq!(customer.notes, "Client historique");
        assert_eq!(customer.sites.len(), 2);

        let lyon = customer.site_named("lyon").unwrap();
        assert_eq!(lyon.general_info, "Bâtiment A");
        assert_eq!(lyon.orders.len(), 2);
        let frame = &lyon.orders[0];
        assert_eq!(frame.part_type, PartType::Frames);
        assert_eq!(frame.part.number, "F-001");
        assert!(frame.part.is_sent);
        assert_eq!(frame.part.user_name, "Jean Dupont");
        assert_eq!(frame.part.notes.as_deref(), Some("Urgent"));
        let door = &lyon.orders[1];
        assert_eq!(door.part_type, PartType::Doors);
        assert!(!door.part.is_sent);
        assert!(door.part.notes.is_none());

        assert_eq!(outcome.users.len(), 1);
        assert_eq!(outcome.users[0].role, Role::Editor);
        assert_eq!(outcome.users[0].email.as_str(), "jean.dupont@import.local");

        assert_eq!(
            outcome.stats,
            ImportStats {
                rows: 3,
                skipped_rows: 0,
                customers_created: 1,
                sites_created: 2,
                users_created: 1,
                orders_created: 3,
                duplicate_orders: 0,
            }
        );
    }

    #[test]
    fn test_import_persists_documents() {
        let mut tracker = tracker();
        let text = csv(&["Eiffage,,Paris,,Huisseries,F-1,,,Marc,,Admin"]);
        tracker.import_csv(&text, &ImportConfig::default()).unwrap();

        let customers: Vec<Customer> = load_json(tracker.store(), CUSTOMERS_KEY).unwrap();
        let users: Vec<User> = load_json(tracker.store(), USERS_KEY).unwrap();
        assert_eq!(customers, tracker.customers());
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].role, Role::Admin);
    }

    #[test]
    fn test_reimport_is_idempotent() {
        let mut tracker = tracker();
        let text = csv(&[
            "Vinci,,Lyon,,Huisseries,F-001,Envoyée,23/10/2025,Jean,,",
            "Vinci,,Lyon,,Portes,P-001,,23/10/2025,Jean,,",
        ]);
        let first = tracker.import_csv(&text, &ImportConfig::default()).unwrap();
        let second = tracker.import_csv(&text, &ImportConfig::default()).unwrap();

        assert_eq!(first.customers, second.customers);
        assert_eq!(first.users, second.users);
        assert_eq!(second.stats.orders_created, 0);
        assert_eq!(second.stats.duplicate_orders, 2);
        assert_eq!(second.stats.users_created, 0);
    }

    #[test]
    fn test_row_without_customer_contributes_nothing() {
        let mut tracker = tracker();
        let text = csv(&[",notes,Lyon,info,Huisseries,F-1,Envoyée,,Jean,,Admin"]);
        let outcome = tracker.import_csv(&text, &ImportConfig::default()).unwrap();

        assert!(outcome.customers.is_empty());
        assert!(outcome.users.is_empty());
        assert_eq!(outcome.stats.skipped_rows, 1);
    }

    #[test]
    fn test_new_user_role_defaults_to_viewer() {
        let mut tracker = tracker();
        let text = csv(&[
            "A,,S,,Huisseries,F-1,,,Paul,,",
            "A,,S,,Huisseries,F-2,,,Luc,,chef",
            "A,,S,,Huisseries,F-3,,,Marie,,eDITOR",
        ]);
        tracker.import_csv(&text, &ImportConfig::default()).unwrap();

        let role = |name: &str| tracker.find_user_by_name(name).unwrap().role;
        assert_eq!(role("Paul"), Role::Viewer);
        assert_eq!(role("Luc"), Role::Viewer);
        assert_eq!(role("Marie"), Role::Editor);
    }

    #[test]
    fn test_imported_user_gets_placeholder_password_and_free_email() {
        let mut tracker = tracker();
        tracker
            .add_user(NewUser {
                name: "Jean D.".to_string(),
                email: "jean.dupont@chantier.fr".to_string(),
                role: Role::Admin,
                password: None,
            })
            .unwrap();
        let config = ImportConfig {
            placeholder_password: SecretString::from("temporaire"),
            email_domain: "chantier.fr".to_string(),
        };

        let text = csv(&["A,,S,,Portes,P-1,,,Jean  Dupont,,"]);
        tracker.import_csv(&text, &config).unwrap();

        let user = tracker.find_user_by_name("jean  dupont").unwrap();
        assert_eq!(user.email.as_str(), "jean.dupont.2@chantier.fr");
        assert!(
            tracker
                .authenticate("jean.dupont.2@chantier.fr", &config.placeholder_password)
                .is_ok()
        );
        assert_eq!(config.exposed_password(), "temporaire");
    }

    #[test]
    fn test_existing_user_is_reused() {
        let mut tracker = tracker();
        let luc = tracker
            .add_user(NewUser {
                name: "Luc".to_string(),
                email: "luc@chantier.fr".to_string(),
                role: Role::Editor,
                password: None,
            })
            .unwrap();

        let text = csv(&["A,,S,,Portes,P-1,,,LUC,,Admin"]);
        let outcome = tracker.import_csv(&text, &ImportConfig::default()).unwrap();

        assert_eq!(outcome.users.len(), 1);
        assert_eq!(outcome.users[0].role, Role::Editor);
        let order = &outcome.customers[0].sites[0].orders[0];
        assert_eq!(order.part.user_id, luc.id);
        assert_eq!(order.part.user_name, "Luc");
    }

    #[test]
    fn test_backfill_never_overwrites() {
        let mut tracker = tracker();
        let customer = tracker.add_customer("Vinci", "").unwrap();
        tracker.add_site(customer.id, "Lyon", "Accès rue Garibaldi").unwrap();

        let text = csv(&["vinci,Paiement 60 jours,LYON,Autre info,,,,,,,"]);
        let outcome = tracker.import_csv(&text, &ImportConfig::default()).unwrap();

        assert_eq!(outcome.stats.customers_created, 0);
        assert_eq!(outcome.stats.sites_created, 0);
        let customer = tracker.customer(customer.id).unwrap();
        assert_eq!(customer.notes, "Paiement 60 jours");
        assert_eq!(customer.sites[0].general_info, "Accès rue Garibaldi");
    }

    #[test]
    fn test_incomplete_order_columns_create_no_order() {
        let mut tracker = tracker();
        let text = csv(&[
            "A,,S,,Huisseries,F-1,,,,,",
            "A,,S,,Fenêtres,F-2,,,Jean,,",
            "A,,S,,,F-3,,,Jean,,",
            "A,,S,,Portes,,,,Jean,,",
            "A,,,,Portes,P-9,,,Jean,,",
        ]);
        let outcome = tracker.import_csv(&text, &ImportConfig::default()).unwrap();

        assert_eq!(outcome.customers.len(), 1);
        assert_eq!(outcome.customers[0].sites.len(), 1);
        assert!(outcome.customers[0].sites[0].orders.is_empty());
        assert_eq!(outcome.stats.orders_created, 0);
        assert_eq!(outcome.stats.users_created, 1);
    }

    #[test]
    fn test_unreadable_date_falls_back_to_now() {
        let mut tracker = tracker();
        let before = Utc::now();
        let text = csv(&["A,,S,,Portes,P-1,,31/02/2025,Jean,,"]);
        let outcome = tracker.import_csv(&text, &ImportConfig::default()).unwrap();

        let created_at = outcome.customers[0].sites[0].orders[0].part.created_at;
        assert!(created_at >= before);
        assert!(created_at <= Utc::now());
    }

    #[test]
    fn test_empty_file_changes_nothing() {
        let mut tracker = tracker();
        assert!(matches!(
            tracker.import_csv(HEADER, &ImportConfig::default()),
            Err(ImportError::EmptyFile)
        ));
        assert!(tracker.store().is_empty());
    }

    #[test]
    fn test_failed_merge_still_saves_merged_rows() {
        let mut tracker = tracker();
        tracker.customers.push(Customer {
            id: CustomerId::generate(),
            name: "Vinci".to_string(),
            notes: String::new(),
            sites: Vec::new(),
        });

        let result = tracker.persist_import(Err(TrackerError::PasswordHash.into()));

        assert!(matches!(
            result,
            Err(ImportError::Tracker(TrackerError::PasswordHash))
        ));
        let customers: Vec<Customer> = load_json(tracker.store(), CUSTOMERS_KEY).unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].name, "Vinci");
        assert_eq!(tracker.store().len(), 2);
    }

    #[test]
    fn test_email_local_part() {
        assert_eq!(email_local_part("Jean  Dupont"), "jean.dupont");
        assert_eq!(email_local_part("Élise"), "élise");
    }
}
