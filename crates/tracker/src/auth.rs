//! Password hashing helpers.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::{ExposeSecret, SecretString};

use crate::error::TrackerError;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Validate password strength.
pub(crate) fn validate_password(password: &SecretString) -> Result<(), TrackerError> {
    if password.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
        return Err(TrackerError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
pub(crate) fn hash_password(password: &SecretString) -> Result<String, TrackerError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.expose_secret().as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| TrackerError::PasswordHash)
}

/// Verify a password against a hash.
pub(crate) fn verify_password(password: &SecretString, hash: &str) -> Result<(), TrackerError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| TrackerError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.expose_secret().as_bytes(), &parsed_hash)
        .map_err(|_| TrackerError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let password = SecretString::from("correct horse");
        let hash = hash_password(&password).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(&password, &hash).is_ok());
        assert!(matches!(
            verify_password(&SecretString::from("wrong horse"), &hash),
            Err(TrackerError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(verify_password(&SecretString::from("whatever"), "plain").is_err());
    }

    #[test]
    fn test_validate_password_length() {
        assert!(validate_password(&SecretString::from("short")).is_err());
        assert!(validate_password(&SecretString::from("longenough")).is_ok());
    }
}
