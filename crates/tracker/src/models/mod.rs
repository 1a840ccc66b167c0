//! Domain types held by the tracker.
//!
//! These are the shapes persisted as JSON documents (camelCase field names)
//! and handed out to callers.

pub mod customer;
pub mod file;
pub mod option;
pub mod order;
pub mod user;

pub use customer::{ConstructionSite, Customer, CustomerUpdate, SiteUpdate};
pub use file::UploadedFile;
pub use option::{SpecialOption, SpecialOptionUpdate};
pub use order::{NewOrder, Order, OrderPart, OrderUpdate};
pub use user::{NewUser, PublicUser, User, UserUpdate};
