//! User roles.

use serde::{Deserialize, Serialize};

/// Permission level of a tracker user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    /// Full access including user management.
    Admin,
    /// Can create and edit customers, sites and orders.
    Editor,
    /// Read-only access.
    #[default]
    Viewer,
}

impl Role {
    /// All roles, most privileged first.
    pub const ALL: [Self; 3] = [Self::Admin, Self::Editor, Self::Viewer];

    /// The canonical (`PascalCase`) label of this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Editor => "Editor",
            Self::Viewer => "Viewer",
        }
    }

    /// Normalize free text into a role.
    ///
    /// The input is trimmed and re-cased to `PascalCase` (`"eDITOR"` becomes
    /// `"Editor"`). Anything that is not one of the known roles falls back to
    /// [`Role::Viewer`].
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        let raw = raw.trim();
        let mut chars = raw.chars();
        let pascal: String = chars.next().map_or_else(String::new, |first| {
            first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect()
        });
        pascal.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Self::Admin),
            "Editor" => Ok(Self::Editor),
            "Viewer" => Ok(Self::Viewer),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}
