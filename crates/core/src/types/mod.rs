//! Core types for Site Tracker.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod part;
pub mod role;

pub use email::{Email, EmailError};
pub use id::*;
pub use part::PartType;
pub use role::Role;
