//! Site Tracker Core - Shared types library.
//!
//! This crate provides common types used across all Site Tracker components:
//! - `site-tracker` - Repository, storage backends and the CSV import engine
//! - `cli` - Command-line tools for importing and managing tracker data
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, roles and part types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
