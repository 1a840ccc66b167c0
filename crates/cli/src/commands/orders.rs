//! Order commands.

use tracing::info;

use site_tracker::models::{NewOrder, OrderUpdate};
use site_tracker_core::{CustomerId, OrderId, PartType, SiteId, UserId};

use super::{CommandError, open_tracker};

/// Arguments of `orders add`.
pub struct NewOrderArgs {
    pub part_type: PartType,
    pub number: String,
    pub user: UserId,
    pub sent: bool,
    pub notes: Option<String>,
}

/// Add an order to a site.
///
/// # Errors
///
/// Returns an error for unknown parents or user, or a duplicate part number.
pub fn add(
    customer_id: CustomerId,
    site_id: SiteId,
    args: NewOrderArgs,
) -> Result<(), CommandError> {
    let (mut tracker, _) = open_tracker()?;
    let order = tracker.add_order(
        customer_id,
        site_id,
        NewOrder {
            is_sent: args.sent,
            notes: args.notes,
            ..NewOrder::new(args.part_type, args.number, args.user)
        },
    )?;

    info!(
        id = %order.id,
        part_type = %order.part_type,
        number = %order.part.number,
        "Order created"
    );
    Ok(())
}

/// Mark an order as sent to the supplier.
///
/// # Errors
///
/// Returns an error if the order does not exist.
pub fn mark_sent(
    customer_id: CustomerId,
    site_id: SiteId,
    order_id: OrderId,
) -> Result<(), CommandError> {
    let (mut tracker, _) = open_tracker()?;
    tracker.update_order(
        customer_id,
        site_id,
        order_id,
        OrderUpdate {
            is_sent: Some(true),
            ..OrderUpdate::default()
        },
    )?;

    info!(id = %order_id, "Order marked as sent");
    Ok(())
}

/// Delete an order.
///
/// # Errors
///
/// Returns an error if the order does not exist.
pub fn delete(
    customer_id: CustomerId,
    site_id: SiteId,
    order_id: OrderId,
) -> Result<(), CommandError> {
    let (mut tracker, _) = open_tracker()?;
    tracker.delete_order(customer_id, site_id, order_id)?;
    Ok(())
}
