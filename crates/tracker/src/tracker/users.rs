//! User management and authentication.

use secrecy::SecretString;

use site_tracker_core::{Email, Role, UserId};

use super::{Tracker, required_name};
use crate::auth::{hash_password, validate_password, verify_password};
use crate::error::TrackerError;
use crate::models::{NewUser, PublicUser, User, UserUpdate};
use crate::storage::{BlobStore, KeyValueStore};

impl<S: KeyValueStore, B: BlobStore> Tracker<S, B> {
    /// Every user, credentials stripped.
    #[must_use]
    pub fn list_users(&self) -> Vec<PublicUser> {
        self.users.iter().map(PublicUser::from).collect()
    }

    /// Find a user by case-insensitive name.
    #[must_use]
    pub fn find_user_by_name(&self, name: &str) -> Option<&User> {
        self.users.iter().find(|u| u.has_name(name))
    }

    /// Find a user by case-insensitive email.
    #[must_use]
    pub fn find_user_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|u| u.email.matches(email))
    }

    #[must_use]
    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::EmptyName`, `InvalidEmail` or `WeakPassword` on
    /// invalid input, `DuplicateUserName` / `DuplicateEmail` if another user
    /// already has the name or email (case-insensitive).
    pub fn add_user(&mut self, new_user: NewUser) -> Result<PublicUser, TrackerError> {
        let name = required_name("user", &new_user.name)?;
        let email = Email::parse(&new_user.email)?;
        self.ensure_unique(None, &name, &email)?;

        let password_hash = new_user
            .password
            .as_ref()
            .map(|password| {
                validate_password(password)?;
                hash_password(password)
            })
            .transpose()?;

        let user = User {
            id: UserId::generate(),
            name,
            email,
            role: new_user.role,
            password_hash,
        };
        let public = PublicUser::from(&user);
        self.users.push(user);
        self.persist_users()?;

        tracing::info!(user_id = %public.id, role = %public.role, "User created");
        Ok(public)
    }

    /// Apply a partial update to a user.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::NotFound` for an unknown user, and the same
    /// validation errors as [`Tracker::add_user`].
    pub fn update_user(
        &mut self,
        id: UserId,
        update: UserUpdate,
    ) -> Result<PublicUser, TrackerError> {
        let current = self
            .user(id)
            .ok_or_else(|| TrackerError::not_found("user", id))?;

        let name = match &update.name {
            Some(name) => required_name("user", name)?,
            None => current.name.clone(),
        };
        let email = match &update.email {
            Some(email) => Email::parse(email)?,
            None => current.email.clone(),
        };
        self.ensure_unique(Some(id), &name, &email)?;

        let password_hash = update
            .password
            .as_ref()
            .map(|password| {
                validate_password(password)?;
                hash_password(password)
            })
            .transpose()?;

        let user = self
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| TrackerError::not_found("user", id))?;
        user.name = name;
        user.email = email;
        if let Some(role) = update.role {
            user.role = role;
        }
        if password_hash.is_some() {
            user.password_hash = password_hash;
        }
        let public = PublicUser::from(&*user);
        self.persist_users()?;

        Ok(public)
    }

    /// Remove a user. Orders keep their name snapshot.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::NotFound` for an unknown user.
    pub fn delete_user(&mut self, id: UserId) -> Result<(), TrackerError> {
        let before = self.users.len();
        self.users.retain(|u| u.id != id);
        if self.users.len() == before {
            return Err(TrackerError::not_found("user", id));
        }
        self.persist_users()?;

        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// Check an email/password pair.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidCredentials` if the user is unknown, has
    /// no password, or the password does not match.
    pub fn authenticate(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<PublicUser, TrackerError> {
        let user = self
            .find_user_by_email(email)
            .ok_or(TrackerError::InvalidCredentials)?;
        let hash = user
            .password_hash
            .as_deref()
            .ok_or(TrackerError::InvalidCredentials)?;

        verify_password(password, hash)?;
        Ok(PublicUser::from(user))
    }

    /// Resolve an identity returned by a third-party sign-in provider.
    ///
    /// Returns the user owning `email`, or registers a password-less
    /// [`Role::Viewer`]. When `display_name` is already taken by someone else
    /// a numeric suffix is appended.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidEmail` or `EmptyName` on invalid input.
    pub fn link_external_account(
        &mut self,
        email: &str,
        display_name: &str,
    ) -> Result<PublicUser, TrackerError> {
        if let Some(user) = self.find_user_by_email(email) {
            return Ok(PublicUser::from(user));
        }

        let base = required_name("user", display_name)?;
        let name = self.free_user_name(&base);
        self.add_user(NewUser {
            name,
            email: email.to_owned(),
            role: Role::Viewer,
            password: None,
        })
    }

    /// `base`, or `base (2)`, `base (3)`... whichever is not taken.
    pub(crate) fn free_user_name(&self, base: &str) -> String {
        let mut candidate = base.to_owned();
        let mut n = 2;
        while self.find_user_by_name(&candidate).is_some() {
            candidate = format!("{base} ({n})");
            n += 1;
        }
        candidate
    }

    fn ensure_unique(
        &self,
        except: Option<UserId>,
        name: &str,
        email: &Email,
    ) -> Result<(), TrackerError> {
        let others = self.users.iter().filter(|u| Some(u.id) != except);
        for other in others {
            if other.has_name(name) {
                return Err(TrackerError::DuplicateUserName(name.to_owned()));
            }
            if other.email.matches(email.as_str()) {
                return Err(TrackerError::DuplicateEmail(email.to_string()));
            }
        }
        Ok(())
    }
}
