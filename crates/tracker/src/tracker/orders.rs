//! Order operations.

use chrono::Utc;

use site_tracker_core::{CustomerId, OrderId, SiteId};

use super::Tracker;
use crate::error::TrackerError;
use crate::models::{NewOrder, Order, OrderPart, OrderUpdate};
use crate::storage::{BlobStore, KeyValueStore};

impl<S: KeyValueStore, B: BlobStore> Tracker<S, B> {
    /// Append an order to a site.
    ///
    /// The assigned user's current name is copied onto the order.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::NotFound` for an unknown customer, site or user,
    /// `TrackerError::EmptyPartNumber` for a blank number, and
    /// `TrackerError::DuplicatePartNumber` if the site already has that part.
    pub fn add_order(
        &mut self,
        customer_id: CustomerId,
        site_id: SiteId,
        new_order: NewOrder,
    ) -> Result<Order, TrackerError> {
        let number = new_order.number.trim().to_owned();
        if number.is_empty() {
            return Err(TrackerError::EmptyPartNumber);
        }

        let user_name = self
            .user(new_order.user_id)
            .ok_or_else(|| TrackerError::not_found("user", new_order.user_id))?
            .name
            .clone();

        let site = self.site_mut(customer_id, site_id)?;
        if site.has_part(new_order.part_type, &number) {
            return Err(TrackerError::DuplicatePartNumber {
                part_type: new_order.part_type,
                number,
            });
        }

        let order = Order {
            id: OrderId::generate(),
            part_type: new_order.part_type,
            part: OrderPart {
                number,
                is_sent: new_order.is_sent,
                created_at: new_order.created_at.unwrap_or_else(Utc::now),
                user_id: new_order.user_id,
                user_name,
                notes: non_empty(new_order.notes),
            },
        };
        site.orders.push(order.clone());
        self.persist_customers()?;

        tracing::debug!(%site_id, order_id = %order.id, part_type = %order.part_type, "Order created");
        Ok(order)
    }

    #[must_use]
    pub fn order(
        &self,
        customer_id: CustomerId,
        site_id: SiteId,
        order_id: OrderId,
    ) -> Option<&Order> {
        self.site(customer_id, site_id)?
            .orders
            .iter()
            .find(|o| o.id == order_id)
    }

    /// Apply a partial update to an order.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::NotFound` for an unknown customer, site, order
    /// or reassigned user, and the part-number errors of
    /// [`Tracker::add_order`] when renumbering.
    pub fn update_order(
        &mut self,
        customer_id: CustomerId,
        site_id: SiteId,
        order_id: OrderId,
        update: OrderUpdate,
    ) -> Result<Order, TrackerError> {
        let reassigned = update
            .user_id
            .map(|user_id| {
                self.user(user_id)
                    .map(|u| (u.id, u.name.clone()))
                    .ok_or_else(|| TrackerError::not_found("user", user_id))
            })
            .transpose()?;

        let site = self.site_mut(customer_id, site_id)?;
        let part_type = site
            .orders
            .iter()
            .find(|o| o.id == order_id)
            .map(|o| o.part_type)
            .ok_or_else(|| TrackerError::not_found("order", order_id))?;

        let number = match update.number {
            Some(number) => {
                let number = number.trim().to_owned();
                if number.is_empty() {
                    return Err(TrackerError::EmptyPartNumber);
                }
                let taken = site
                    .orders
                    .iter()
                    .any(|o| o.id != order_id && o.is_part(part_type, &number));
                if taken {
                    return Err(TrackerError::DuplicatePartNumber { part_type, number });
                }
                Some(number)
            }
            None => None,
        };

        let order = site
            .orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or_else(|| TrackerError::not_found("order", order_id))?;
        if let Some(number) = number {
            order.part.number = number;
        }
        if let Some(is_sent) = update.is_sent {
            order.part.is_sent = is_sent;
        }
        if let Some(notes) = update.notes {
            order.part.notes = non_empty(notes);
        }
        if let Some((user_id, user_name)) = reassigned {
            order.part.user_id = user_id;
            order.part.user_name = user_name;
        }
        let updated = order.clone();
        self.persist_customers()?;

        Ok(updated)
    }

    /// Remove an order from a site.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::NotFound` for an unknown customer, site or order.
    pub fn delete_order(
        &mut self,
        customer_id: CustomerId,
        site_id: SiteId,
        order_id: OrderId,
    ) -> Result<(), TrackerError> {
        let site = self.site_mut(customer_id, site_id)?;
        let before = site.orders.len();
        site.orders.retain(|o| o.id != order_id);
        if site.orders.len() == before {
            return Err(TrackerError::not_found("order", order_id));
        }
        self.persist_customers()?;

        Ok(())
    }
}

fn non_empty(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().to_owned())
        .filter(|n| !n.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use site_tracker_core::{PartType, Role, UserId};

    use super::*;
    use crate::models::{NewUser, PublicUser, UserUpdate};
    use crate::tracker::test_support::{MemoryTracker, tracker};

    fn setup() -> (MemoryTracker, CustomerId, SiteId, PublicUser) {
        let mut tracker = tracker();
        let user = tracker
            .add_user(NewUser {
                name: "Luc".to_string(),
                email: "luc@chantier.fr".to_string(),
                role: Role::Editor,
                password: None::<SecretString>,
            })
            .unwrap();
        let customer = tracker.add_customer("Vinci", "").unwrap();
        let site = tracker.add_site(customer.id, "Lyon", "").unwrap();
        (tracker, customer.id, site.id, user)
    }

    #[test]
    fn test_add_order_snapshots_user_name() {
        let (mut tracker, customer_id, site_id, user) = setup();
        let order = tracker
            .add_order(customer_id, site_id, NewOrder::new(PartType::Doors, " P-12 ", user.id))
            .unwrap();

        assert_eq!(order.part.number, "P-12");
        assert_eq!(order.part.user_name, "Luc");
        assert!(!order.part.is_sent);

        tracker
            .update_user(
                user.id,
                UserUpdate {
                    name: Some("Lucas".to_string()),
                    ..UserUpdate::default()
                },
            )
            .unwrap();
        let stored = tracker.order(customer_id, site_id, order.id).unwrap();
        assert_eq!(stored.part.user_name, "Luc");
    }

    #[test]
    fn test_part_number_unique_per_site_and_type() {
        let (mut tracker, customer_id, site_id, user) = setup();
        tracker
            .add_order(customer_id, site_id, NewOrder::new(PartType::Frames, "F-001", user.id))
            .unwrap();

        let duplicate =
            tracker.add_order(customer_id, site_id, NewOrder::new(PartType::Frames, "F-001", user.id));
        assert!(matches!(
            duplicate,
            Err(TrackerError::DuplicatePartNumber { part_type: PartType::Frames, .. })
        ));

        // Same number, other part type: allowed.
        tracker
            .add_order(customer_id, site_id, NewOrder::new(PartType::Doors, "F-001", user.id))
            .unwrap();
        assert_eq!(tracker.site(customer_id, site_id).unwrap().orders.len(), 2);
    }

    #[test]
    fn test_add_order_requires_known_user_and_number() {
        let (mut tracker, customer_id, site_id, user) = setup();
        assert!(matches!(
            tracker.add_order(
                customer_id,
                site_id,
                NewOrder::new(PartType::Frames, "F-1", UserId::generate())
            ),
            Err(TrackerError::NotFound { entity: "user", .. })
        ));
        assert!(matches!(
            tracker.add_order(customer_id, site_id, NewOrder::new(PartType::Frames, "  ", user.id)),
            Err(TrackerError::EmptyPartNumber)
        ));
    }

    #[test]
    fn test_update_order() {
        let (mut tracker, customer_id, site_id, user) = setup();
        let first = tracker
            .add_order(customer_id, site_id, NewOrder::new(PartType::Frames, "F-1", user.id))
            .unwrap();
        tracker
            .add_order(customer_id, site_id, NewOrder::new(PartType::Frames, "F-2", user.id))
            .unwrap();

        let updated = tracker
            .update_order(
                customer_id,
                site_id,
                first.id,
                OrderUpdate {
                    is_sent: Some(true),
                    notes: Some(Some("Livraison lundi".to_string())),
                    ..OrderUpdate::default()
                },
            )
            .unwrap();
        assert!(updated.part.is_sent);
        assert_eq!(updated.part.notes.as_deref(), Some("Livraison lundi"));

        let renumber = tracker.update_order(
            customer_id,
            site_id,
            first.id,
            OrderUpdate {
                number: Some("F-2".to_string()),
                ..OrderUpdate::default()
            },
        );
        assert!(matches!(renumber, Err(TrackerError::DuplicatePartNumber { .. })));
    }

    #[test]
    fn test_delete_order() {
        let (mut tracker, customer_id, site_id, user) = setup();
        let order = tracker
            .add_order(customer_id, site_id, NewOrder::new(PartType::Doors, "P-1", user.id))
            .unwrap();

        tracker.delete_order(customer_id, site_id, order.id).unwrap();
        assert!(tracker.order(customer_id, site_id, order.id).is_none());
        assert!(matches!(
            tracker.delete_order(customer_id, site_id, order.id),
            Err(TrackerError::NotFound { entity: "order", .. })
        ));
    }
}
