//! Customers and their construction sites.

use serde::{Deserialize, Serialize};

use site_tracker_core::{CustomerId, PartType, SiteId};

use super::{Order, UploadedFile};

/// A customer and the sites worked on for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    /// Display name, used as the case-insensitive merge key on import.
    pub name: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub sites: Vec<ConstructionSite>,
}

impl Customer {
    /// Case-insensitive name comparison.
    #[must_use]
    pub fn has_name(&self, name: &str) -> bool {
        same_name(&self.name, name)
    }

    /// Find a site by case-insensitive name.
    #[must_use]
    pub fn site_named(&self, name: &str) -> Option<&ConstructionSite> {
        self.sites.iter().find(|s| s.has_name(name))
    }
}

/// A construction site belonging to a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructionSite {
    pub id: SiteId,
    /// Display name, the merge key within a customer.
    pub name: String,
    #[serde(default)]
    pub general_info: String,
    #[serde(default)]
    pub files: Vec<UploadedFile>,
    #[serde(default)]
    pub orders: Vec<Order>,
}

impl ConstructionSite {
    /// Case-insensitive name comparison.
    #[must_use]
    pub fn has_name(&self, name: &str) -> bool {
        same_name(&self.name, name)
    }

    /// Whether an order of `part_type` numbered `number` already exists here.
    #[must_use]
    pub fn has_part(&self, part_type: PartType, number: &str) -> bool {
        self.orders.iter().any(|o| o.is_part(part_type, number))
    }
}

/// Partial update of a customer. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub notes: Option<String>,
}

/// Partial update of a site. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct SiteUpdate {
    pub name: Option<String>,
    pub general_info: Option<String>,
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
