//! Order part types.

use serde::{Deserialize, Serialize};

/// The two categories of orderable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PartType {
    /// Door frames ("huisseries").
    Frames,
    /// Doors ("portes").
    Doors,
}

impl PartType {
    /// Map the label used in imported spreadsheets to a part type.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Unknown labels return `None`.
    #[must_use]
    pub fn from_import_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "huisseries" => Some(Self::Frames),
            "portes" => Some(Self::Doors),
            _ => None,
        }
    }

    /// The spreadsheet label for this part type.
    #[must_use]
    pub const fn import_label(&self) -> &'static str {
        match self {
            Self::Frames => "Huisseries",
            Self::Doors => "Portes",
        }
    }
}

impl std::fmt::Display for PartType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Frames => write!(f, "frames"),
            Self::Doors => write!(f, "doors"),
        }
    }
}

impl std::str::FromStr for PartType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "frames" => Ok(Self::Frames),
            "doors" => Ok(Self::Doors),
            other => Self::from_import_label(other).ok_or_else(|| format!("invalid part type: {s}")),
        }
    }
}
