//! Order types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use site_tracker_core::{OrderId, PartType, UserId};

/// An order placed for a construction site.
///
/// Every order carries exactly one part, tagged with its [`PartType`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub part_type: PartType,
    pub part: OrderPart,
}

impl Order {
    /// Whether this order is a `part_type` part numbered `number`.
    #[must_use]
    pub fn is_part(&self, part_type: PartType, number: &str) -> bool {
        self.part_type == part_type && self.part.number == number
    }
}

/// The ordered item itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPart {
    /// Part number, unique per (site, part type).
    pub number: String,
    /// Whether the order has been sent to the supplier.
    pub is_sent: bool,
    pub created_at: DateTime<Utc>,
    /// User the order is assigned to.
    pub user_id: UserId,
    /// Snapshot of the user's name at assignment time.
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Input for creating an order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub part_type: PartType,
    pub number: String,
    pub user_id: UserId,
    pub is_sent: bool,
    pub notes: Option<String>,
    /// Defaults to the current time.
    pub created_at: Option<DateTime<Utc>>,
}

impl NewOrder {
    /// A not-yet-sent order created now.
    #[must_use]
    pub fn new(part_type: PartType, number: impl Into<String>, user_id: UserId) -> Self {
        Self {
            part_type,
            number: number.into(),
            user_id,
            is_sent: false,
            notes: None,
            created_at: None,
        }
    }
}

/// Partial update of an order. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct OrderUpdate {
    pub number: Option<String>,
    pub is_sent: Option<bool>,
    /// `Some(None)` clears the notes.
    pub notes: Option<Option<String>>,
    /// Reassign to another user; the name snapshot is refreshed.
    pub user_id: Option<UserId>,
}
