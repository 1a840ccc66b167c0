//! Tracker configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SITE_TRACKER_DATA_DIR` - Root directory for documents and blobs (default: `./data`)
//! - `SITE_TRACKER_IMPORT_PASSWORD` - Placeholder password given to users
//!   created by a CSV import (default: `changeme-import`, min 8 chars)
//! - `SITE_TRACKER_IMPORT_EMAIL_DOMAIN` - Domain used for the email of users
//!   created by a CSV import (default: `import.local`)

use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

use crate::auth::MIN_PASSWORD_LENGTH;

const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_IMPORT_PASSWORD: &str = "changeme-import";
const DEFAULT_IMPORT_EMAIL_DOMAIN: &str = "import.local";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Tracker configuration.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Root directory; documents go to `store/`, attachments to `blobs/`.
    pub data_dir: PathBuf,
    /// Settings for CSV imports.
    pub import: ImportConfig,
}

impl TrackerConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unusable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = lookup("SITE_TRACKER_DATA_DIR")
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);

        let placeholder_password = match lookup("SITE_TRACKER_IMPORT_PASSWORD") {
            Some(value) if value.chars().count() < MIN_PASSWORD_LENGTH => {
                return Err(ConfigError::InvalidEnvVar(
                    "SITE_TRACKER_IMPORT_PASSWORD".to_owned(),
                    format!("must be at least {MIN_PASSWORD_LENGTH} characters"),
                ));
            }
            Some(value) => SecretString::from(value),
            None => SecretString::from(DEFAULT_IMPORT_PASSWORD),
        };

        let email_domain = match lookup("SITE_TRACKER_IMPORT_EMAIL_DOMAIN") {
            Some(value) if value.is_empty() || value.contains(['@', ' ']) => {
                return Err(ConfigError::InvalidEnvVar(
                    "SITE_TRACKER_IMPORT_EMAIL_DOMAIN".to_owned(),
                    format!("'{value}' is not a domain"),
                ));
            }
            Some(value) => value,
            None => DEFAULT_IMPORT_EMAIL_DOMAIN.to_owned(),
        };

        Ok(Self {
            data_dir,
            import: ImportConfig {
                placeholder_password,
                email_domain,
            },
        })
    }

    /// Directory for JSON documents.
    #[must_use]
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir.join("store")
    }

    /// Directory for attachment payloads.
    #[must_use]
    pub fn blob_dir(&self) -> PathBuf {
        self.data_dir.join("blobs")
    }
}

/// Settings applied when an import has to create users.
#[derive(Clone)]
pub struct ImportConfig {
    /// Password given to users synthesized from `OrderAssignedUser`.
    pub placeholder_password: SecretString,
    /// Domain of the email synthesized for those users.
    pub email_domain: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            placeholder_password: SecretString::from(DEFAULT_IMPORT_PASSWORD),
            email_domain: DEFAULT_IMPORT_EMAIL_DOMAIN.to_owned(),
        }
    }
}

impl std::fmt::Debug for ImportConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportConfig")
            .field("placeholder_password", &"[REDACTED]")
            .field("email_domain", &self.email_domain)
            .finish()
    }
}

#[cfg(test)]
impl ImportConfig {
    pub(crate) fn exposed_password(&self) -> &str {
        use secrecy::ExposeSecret;
        self.placeholder_password.expose_secret()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.store_dir(), PathBuf::from("./data/store"));
        assert_eq!(config.import.email_domain, "import.local");
        assert_eq!(config.import.exposed_password(), "changeme-import");
    }

    #[test]
    fn test_overrides() {
        let config = TrackerConfig::from_lookup(lookup(&[
            ("SITE_TRACKER_DATA_DIR", "/var/lib/tracker"),
            ("SITE_TRACKER_IMPORT_PASSWORD", "a-long-password"),
            ("SITE_TRACKER_IMPORT_EMAIL_DOMAIN", "chantier.fr"),
        ]))
        .unwrap();
        assert_eq!(config.blob_dir(), PathBuf::from("/var/lib/tracker/blobs"));
        assert_eq!(config.import.exposed_password(), "a-long-password");
        assert_eq!(config.import.email_domain, "chantier.fr");
    }

    #[test]
    fn test_rejects_short_password() {
        let err = TrackerConfig::from_lookup(lookup(&[("SITE_TRACKER_IMPORT_PASSWORD", "abc")]))
            .unwrap_err();
        assert!(err.to_string().contains("SITE_TRACKER_IMPORT_PASSWORD"));
    }

    #[test]
    fn test_rejects_bad_domain() {
        assert!(
            TrackerConfig::from_lookup(lookup(&[("SITE_TRACKER_IMPORT_EMAIL_DOMAIN", "a@b")]))
                .is_err()
        );
    }

    #[test]
    fn test_debug_redacts_password() {
        let debug = format!("{:?}", ImportConfig::default());
        assert!(!debug.contains("changeme"));
    }
}
