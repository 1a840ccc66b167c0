//! Error types for tracker operations.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors returned by [`Tracker`](crate::Tracker) operations.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// A required name was empty.
    #[error("{0} name cannot be empty")]
    EmptyName(&'static str),

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] site_tracker_core::EmailError),

    /// Another user already has this name (case-insensitive).
    #[error("a user named '{0}' already exists")]
    DuplicateUserName(String),

    /// Another user already has this email (case-insensitive).
    #[error("a user with email '{0}' already exists")]
    DuplicateEmail(String),

    /// The site already has an order of this part type with this number.
    #[error("{part_type} number '{number}' already exists on this site")]
    DuplicatePartNumber {
        /// Part type of the conflicting order.
        part_type: site_tracker_core::PartType,
        /// Conflicting part number.
        number: String,
    },

    /// Part number was empty.
    #[error("part number cannot be empty")]
    EmptyPartNumber,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Requested entity was not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of entity that was looked up.
        entity: &'static str,
        /// Identifier that was looked up.
        id: String,
    },

    /// Invalid credentials (wrong password, no password, or unknown user).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Persistence failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl TrackerError {
    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
