//! User management commands.

use secrecy::SecretString;
use tracing::info;

use site_tracker::models::NewUser;
use site_tracker_core::{Role, UserId};

use super::{CommandError, open_tracker};

/// Log every user.
///
/// # Errors
///
/// Returns an error if the data directory cannot be read.
pub fn list() -> Result<(), CommandError> {
    let (tracker, _) = open_tracker()?;

    for user in tracker.list_users() {
        info!(id = %user.id, email = %user.email, role = %user.role, "{}", user.name);
    }
    Ok(())
}

/// Create a user, optionally with the password from
/// `SITE_TRACKER_USER_PASSWORD`.
///
/// # Errors
///
/// Returns an error for an unknown role, a missing password variable, or
/// input the tracker rejects.
pub fn create(
    name: &str,
    email: &str,
    role: &str,
    with_password: bool,
) -> Result<(), CommandError> {
    let role: Role = role
        .parse()
        .map_err(|_| CommandError::InvalidRole(role.to_owned()))?;

    let password = if with_password {
        let password = std::env::var("SITE_TRACKER_USER_PASSWORD")
            .map_err(|_| CommandError::MissingEnvVar("SITE_TRACKER_USER_PASSWORD"))?;
        Some(SecretString::from(password))
    } else {
        None
    };

    let (mut tracker, _) = open_tracker()?;
    let user = tracker.add_user(NewUser {
        name: name.to_owned(),
        email: email.to_owned(),
        role,
        password,
    })?;

    info!(id = %user.id, email = %user.email, role = %user.role, "User created");
    if !with_password {
        tracing::warn!("User has no password and cannot sign in with one");
    }
    Ok(())
}

/// Delete a user. Their orders keep the recorded name.
///
/// # Errors
///
/// Returns an error if the user does not exist.
pub fn delete(id: UserId) -> Result<(), CommandError> {
    let (mut tracker, _) = open_tracker()?;
    tracker.delete_user(id)?;
    Ok(())
}
