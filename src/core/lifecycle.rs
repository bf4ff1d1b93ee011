//! Forward-only order status transitions

use crate::core::order::OrderStatus;

/// Result of advancing an order one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Move the order to the given status
    Advance(OrderStatus),
    /// The order has no further status and must be removed
    Remove,
}

impl Transition {
    /// Check whether applying this transition deletes the order
    ///
    /// Reaching `Delivered` removes the order instead of storing it, so both
    /// `Advance(Delivered)` and `Remove` are removals.
    pub fn removes(&self) -> bool {
        match self {
            Transition::Advance(status) => status.is_terminal(),
            Transition::Remove => true,
        }
    }
}

/// Compute the next step for an order in `current` status
pub fn next_status(current: OrderStatus) -> Transition {
    match current {
        OrderStatus::Initiated => Transition::Advance(OrderStatus::Sent),
        OrderStatus::Sent => Transition::Advance(OrderStatus::Delivered),
        OrderStatus::Delivered => Transition::Remove,
    }
}
