//! Site Tracker - Customers, construction sites and part orders.
//!
//! The [`Tracker`] repository owns users, customers (each with its sites,
//! attachments and orders) and special options. Persistence is injected
//! through two traits:
//! - [`storage::KeyValueStore`] - one JSON document per collection
//! - [`storage::BlobStore`] - raw attachment payloads
//!
//! Spreadsheet exports are merged in with [`Tracker::import_csv`].
//!
//! # Example
//!
//! ```
//! use site_tracker::storage::{MemoryBlobStore, MemoryStore};
//! use site_tracker::{ImportConfig, Tracker};
//!
//! let mut tracker = Tracker::open(MemoryStore::new(), MemoryBlobStore::new())?;
//! let outcome = tracker.import_csv(
//!     "CustomerName,SiteName\nVinci,Lyon Part-Dieu\n",
//!     &ImportConfig::default(),
//! )?;
//! assert_eq!(outcome.stats.customers_created, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod auth;
pub mod config;
pub mod error;
pub mod import;
pub mod models;
pub mod storage;
mod tracker;

pub use auth::MIN_PASSWORD_LENGTH;
pub use config::{ConfigError, ImportConfig, TrackerConfig};
pub use error::TrackerError;
pub use import::{ImportError, ImportOutcome, ImportStats};
pub use storage::StorageError;
pub use tracker::Tracker;
